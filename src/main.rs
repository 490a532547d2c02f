use clap::{ArgGroup, Args, Parser, Subcommand, ValueEnum};
use digipin_rs::{
    BoundaryRegion, CsvDigipinConfig, CsvToDigipin, DigipinCell, DigipinError, EncodeResponse,
    GeometryFormat, decode, encode, encode_within,
};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser)]
#[command(name = "digipin")]
#[command(version, about = "Encode and decode DIGIPIN codes")]
struct Cli {
    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Encode a latitude/longitude into a DIGIPIN
    Encode {
        #[arg(allow_negative_numbers = true)]
        latitude: f64,

        #[arg(allow_negative_numbers = true)]
        longitude: f64,

        /// GeoJSON boundary the point must fall inside
        #[arg(long)]
        boundary: Option<PathBuf>,
    },

    /// Decode a DIGIPIN into the center of its cell
    Decode {
        /// Code, with or without separators
        code: String,

        /// Also print the cell bounds
        #[arg(long)]
        bounds: bool,
    },

    /// Encode or decode every row of a CSV file
    Csv(CsvArgs),
}

#[derive(Args)]
#[command(group(ArgGroup::new("source").required(true).args(["lat", "geometry", "code"])))]
struct CsvArgs {
    input: PathBuf,
    output: PathBuf,

    /// Latitude column to encode
    #[arg(long, requires = "lon")]
    lat: Option<String>,

    /// Longitude column to encode
    #[arg(long, requires = "lat")]
    lon: Option<String>,

    /// WKT or GeoJSON geometry column to encode
    #[arg(long)]
    geometry: Option<String>,

    /// DIGIPIN column to decode
    #[arg(long)]
    code: Option<String>,

    /// Add each cell's polygon in the given format
    #[arg(long, value_enum)]
    cell_geometry: Option<CellGeometry>,

    /// Columns to leave out of the output
    #[arg(long, value_delimiter = ',')]
    exclude: Vec<String>,

    /// Log and drop rows that fail instead of stopping
    #[arg(long)]
    skip_invalid: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum CellGeometry {
    Wkt,
    Geojson,
}

impl From<CellGeometry> for GeometryFormat {
    fn from(value: CellGeometry) -> Self {
        match value {
            CellGeometry::Wkt => GeometryFormat::Wkt,
            CellGeometry::Geojson => GeometryFormat::GeoJson,
        }
    }
}

fn to_json(value: &impl serde::Serialize) -> Result<String, DigipinError> {
    serde_json::to_string(value).map_err(|e| DigipinError::IoError(e.to_string()))
}

fn run_csv(args: CsvArgs) -> Result<(), DigipinError> {
    let mut config = match (args.lat, args.lon, args.geometry, args.code) {
        (Some(lat), Some(lon), None, None) => CsvDigipinConfig::encode_coords(lat, lon),
        (None, None, Some(geometry), None) => CsvDigipinConfig::encode_geometry(geometry),
        (None, None, None, Some(code)) => CsvDigipinConfig::decode(code),
        _ => {
            return Err(DigipinError::CsvError(
                "Choose one of --lat/--lon, --geometry or --code".to_string(),
            ));
        }
    };

    config = config
        .exclude(args.exclude)
        .skip_invalid(args.skip_invalid);
    if let Some(format) = args.cell_geometry {
        config = config.with_cell_geometry(format.into());
    }

    let summary = args.input.to_digipin_csv(&args.output, &config)?;
    println!(
        "{} rows read, {} written, {} skipped",
        summary.rows_read, summary.rows_written, summary.rows_skipped
    );
    Ok(())
}

fn run(cli: Cli) -> Result<(), DigipinError> {
    match cli.command {
        Commands::Encode {
            latitude,
            longitude,
            boundary,
        } => {
            let code = match boundary {
                Some(path) => {
                    let region = BoundaryRegion::from_geojson_file(&path)?;
                    debug!(path = %path.display(), "Loaded boundary");
                    encode_within(&region, latitude, longitude)?
                }
                None => encode(latitude, longitude)?,
            };

            if cli.json {
                println!("{}", to_json(&EncodeResponse::from(code))?);
            } else {
                println!("{}", code);
            }
        }
        Commands::Decode { code, bounds } => {
            if bounds {
                let cell = DigipinCell::from_code(&code)?;
                if cli.json {
                    println!("{}", to_json(&cell)?);
                } else {
                    let b = cell.bounds;
                    println!("{}", cell.lat_lng());
                    println!(
                        "bounds: south {:.6}, north {:.6}, west {:.6}, east {:.6}",
                        b.south(),
                        b.north(),
                        b.west(),
                        b.east()
                    );
                }
            } else {
                let ll = decode(&code)?;
                if cli.json {
                    println!("{}", to_json(&ll)?);
                } else {
                    println!("{}", ll);
                }
            }
        }
        Commands::Csv(args) => run_csv(args)?,
    }
    Ok(())
}

fn exit_code(result: Result<(), DigipinError>) -> ExitCode {
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    exit_code(run(Cli::parse()))
}
