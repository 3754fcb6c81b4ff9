use bandbrot::{Palette, PlaneWindow, RenderConfig, Renderer, Rgb};
use clap::{App, Arg, ArgMatches};
use env_logger::Env;
use num::Complex;
use std::path::Path;
use std::str::FromStr;

fn parse_pair<T>(s: &str, separator: char) -> Option<(T, T)>
where
    T: FromStr,
{
    match s.find(separator) {
        None => None,
        Some(index) => match (T::from_str(&s[..index]), T::from_str(&s[index + 1..])) {
            (Ok(l), Ok(r)) => Some((l, r)),
            _ => None,
        },
    }
}

fn parse_complex(s: &str) -> Option<Complex<f64>> {
    match parse_pair(s, ',') {
        Some((re, im)) => Some(Complex { re, im }),
        None => None,
    }
}

fn validate_pair<T: FromStr>(s: &str, separator: char, err: &str) -> Result<(), String> {
    match parse_pair::<T>(s, separator) {
        Some(_) => Ok(()),
        None => Err(err.to_string()),
    }
}

fn validate_range<T: FromStr + Ord>(
    s: &str,
    low: T,
    high: T,
    isnotanumber_err: &str,
    isnotinrange_err: &str,
) -> Result<(), String> {
    match T::from_str(s) {
        Ok(i) => {
            if i >= low && i <= high {
                Ok(())
            } else {
                Err(isnotinrange_err.to_string())
            }
        }
        Err(_) => Err(isnotanumber_err.to_string()),
    }
}

const OUTPUT: &str = "output";
const SIZE: &str = "size";
const LEFTUPPER: &str = "leftupper";
const RIGHTLOWER: &str = "rightlower";
const THREADS: &str = "threads";
const ITERATIONS: &str = "iterations";
const INSIDE: &str = "inside";
const OUTSIDE: &str = "outside";
const VERBOSE: &str = "verbose";

fn args<'a>() -> ArgMatches<'a> {
    let max_threads = num_cpus::get();
    let threads_help = format!(
        "Number of threads to use in solver; 0 or more than {} uses {}",
        max_threads, max_threads
    );

    App::new("bandbrot")
        .version("0.1.0")
        .author("Elf M. Sternberg <elf.sternberg@gmail.com>")
        .about("Banded multi-threaded Mandelbrot renderer")
        .arg(
            Arg::with_name(OUTPUT)
                .required(true)
                .long(OUTPUT)
                .short("o")
                .takes_value(true)
                .help("Output file; .ppm or .pnm for a pixmap, anything else for TGA"),
        )
        .arg(
            Arg::with_name(SIZE)
                .required(false)
                .long(SIZE)
                .short("s")
                .takes_value(true)
                .default_value("480x320")
                .validator(|s| validate_pair::<u16>(&s, 'x', "Could not parse output image size"))
                .help("Size of output image"),
        )
        .arg(
            Arg::with_name(LEFTUPPER)
                .required(false)
                .long(LEFTUPPER)
                .short("l")
                .takes_value(true)
                .allow_hyphen_values(true)
                .default_value("-2.0,1.125")
                .validator(|s| validate_pair::<f64>(&s, ',', "Could not parse left upper corner"))
                .help("Left upper corner of the mandelbrot space"),
        )
        .arg(
            Arg::with_name(RIGHTLOWER)
                .required(false)
                .long(RIGHTLOWER)
                .short("r")
                .takes_value(true)
                .allow_hyphen_values(true)
                .default_value("1.0,-1.125")
                .validator(|s| validate_pair::<f64>(&s, ',', "Could not parse right lower corner"))
                .help("Right lower corner of the mandelbrot space"),
        )
        .arg(
            Arg::with_name(THREADS)
                .required(false)
                .long(THREADS)
                .short("t")
                .takes_value(true)
                .allow_hyphen_values(true)
                .default_value("0")
                .validator(|s| {
                    i64::from_str(&s)
                        .map(|_| ())
                        .map_err(|_| "Could not parse thread count".to_string())
                })
                .help(&threads_help[..]),
        )
        .arg(
            Arg::with_name(ITERATIONS)
                .required(false)
                .long(ITERATIONS)
                .short("i")
                .takes_value(true)
                .default_value("500")
                .validator(move |s| {
                    validate_range(
                        &s,
                        1,
                        200_000,
                        "Could not parse iteration count",
                        "Iteration count must be between 1 and 200000",
                    )
                })
                .help("Iterations before a point is considered inside the set"),
        )
        .arg(
            Arg::with_name(INSIDE)
                .required(false)
                .long(INSIDE)
                .takes_value(true)
                .default_value("black")
                .validator(|s| Rgb::from_str(&s).map(|_| ()))
                .help("Color of points inside the set: a name or #RRGGBB"),
        )
        .arg(
            Arg::with_name(OUTSIDE)
                .required(false)
                .long(OUTSIDE)
                .takes_value(true)
                .default_value("white")
                .validator(|s| Rgb::from_str(&s).map(|_| ()))
                .help("Color of points outside the set: a name or #RRGGBB"),
        )
        .arg(
            Arg::with_name(VERBOSE)
                .long(VERBOSE)
                .short("v")
                .help("Log every band as it starts and finishes"),
        )
        .get_matches()
}

// Every value below has already been through its validator, so a
// parse failure here is a programming error rather than bad input.
fn config(matches: &ArgMatches) -> RenderConfig {
    let (width, height) = parse_pair::<u16>(matches.value_of(SIZE).unwrap(), 'x')
        .expect("Error parsing image dimensions");
    let leftupper = parse_complex(matches.value_of(LEFTUPPER).unwrap())
        .expect("Error parsing left upper point");
    let rightlower = parse_complex(matches.value_of(RIGHTLOWER).unwrap())
        .expect("Error parsing right lower point");
    let threads =
        i64::from_str(matches.value_of(THREADS).unwrap()).expect("Could not parse thread count.");
    let iterations = usize::from_str(matches.value_of(ITERATIONS).unwrap())
        .expect("Could not parse iteration count.");
    let inside = Rgb::from_str(matches.value_of(INSIDE).unwrap()).expect("Bad inside color");
    let outside = Rgb::from_str(matches.value_of(OUTSIDE).unwrap()).expect("Bad outside color");

    RenderConfig {
        width: usize::from(width),
        height: usize::from(height),
        window: PlaneWindow::from_corners(leftupper, rightlower),
        iterations,
        palette: Palette::new(inside, outside),
        threads,
    }
}

fn main() {
    let matches = args();
    let level = if matches.is_present(VERBOSE) {
        "debug"
    } else {
        "warn"
    };
    env_logger::Builder::from_env(Env::default().default_filter_or(level)).init();

    let output = Path::new(matches.value_of(OUTPUT).unwrap());
    let result = Renderer::new(config(&matches)).and_then(|renderer| renderer.render(output));

    match result {
        Err(e) => {
            eprintln!("Render failure: {}", e);
            std::process::exit(e.exit_code());
        }
        Ok(report) => {
            println!(
                "Computing the Mandelbrot set took {} ms.",
                report.elapsed.as_millis()
            );
        }
    }
}
