//! Kickshaws - everyday helpers from the command line
//!
//! Commands:
//! - **normalize**: decode a CSV file of any supported encoding and write it back as UTF-8
//! - **decode**: print a file decoded to text
//! - **select**: filter CSV rows by column value
//! - **mail**: send a plain-text email through the local SMTP relay
//! - **info**: print host name, date and timestamp
//!
//! # Exit Codes
//!
//! | Code | Meaning |
//! |------|---------|
//! | 0 | Success |
//! | 1 | Configuration/argument error |
//! | 3 | File I/O or data error |
//! | 4 | Runtime error (mail, network) |

use clap::Parser;
use std::process::ExitCode;

use kickshaws::cli::{Args, Command, Config};
use kickshaws::csv_handler::{fix_nbsp, EncodeOptions, Record};
use kickshaws::error::KickshawsError;
use kickshaws::files::{slurp_csv, slurp_text, spit, spit_csv};
use kickshaws::logger::{LoggerRegistry, TagLogger};
use kickshaws::mail::{send_email, Email, Recipients};
use kickshaws::query::{select, select_indices};
use kickshaws::util::{hostname, today_as_str, ts};

/// Exit code for success
const EXIT_SUCCESS: u8 = 0;
/// Exit code for configuration/argument errors
const EXIT_CONFIG_ERROR: u8 = 1;
/// Exit code for file I/O and data errors
const EXIT_IO_ERROR: u8 = 3;
/// Exit code for runtime errors
const EXIT_RUNTIME_ERROR: u8 = 4;

fn main() -> ExitCode {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .try_init();

    let args = Args::parse();

    if let Err(e) = args.validate() {
        eprintln!("Error: Configuration error: {}", e);
        eprintln!("  Hint: Use --help for usage information");
        return ExitCode::from(EXIT_CONFIG_ERROR);
    }

    let config = match args.resolve_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: Configuration error: {}", e);
            return ExitCode::from(EXIT_CONFIG_ERROR);
        }
    };

    let registry = LoggerRegistry::new(config.logging.clone());
    let logger = match registry.logger(&args.log_tag) {
        Ok(logger) => logger,
        Err(e) => {
            eprintln!("Error: Could not set up logging: {}", e);
            return ExitCode::from(EXIT_IO_ERROR);
        }
    };

    match run(&args.command, &config, &logger) {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(e) => {
            logger.error(format!("{:?} failed: {}", args.command, e));
            eprintln!("Error: {}", e);
            ExitCode::from(error_to_exit_code(&e))
        }
    }
}

/// Dispatches one command.
fn run(command: &Command, config: &Config, logger: &TagLogger) -> Result<(), KickshawsError> {
    match command {
        Command::Normalize {
            input,
            output,
            bom,
            fix_nbsp: fix,
        } => {
            let mut table = slurp_csv(input)?;
            if *fix {
                table = table.iter().map(without_nbsp).collect();
            }
            let options = EncodeOptions { include_bom: *bom };
            if table.is_empty() {
                // Nothing to derive a header from; write an empty file.
                let empty: &[u8] = if *bom { b"\xEF\xBB\xBF" } else { b"" };
                spit(output, empty)?;
            } else {
                spit_csv(output, &table, &options)?;
            }
            logger.info(format!(
                "Normalized {} ({} rows) into {}",
                input.display(),
                table.len(),
                output.display()
            ));
        }

        Command::Decode { input, fix_nbsp: fix } => {
            let text = slurp_text(input)?;
            let text = if *fix { fix_nbsp(&text) } else { text };
            print!("{}", text);
            logger.info(format!("Decoded {}", input.display()));
        }

        Command::Select {
            input,
            key,
            value,
            output,
        } => {
            let table = slurp_csv(input)?;
            match output {
                Some(output) => {
                    let selected = select(&table, key, value);
                    if selected.is_empty() {
                        println!("No rows with {}={}", key, value);
                    } else {
                        spit_csv(output, &selected, &EncodeOptions::default())?;
                        println!("Wrote {} rows to {}", selected.len(), output.display());
                    }
                    logger.info(format!(
                        "Selected {} of {} rows from {} where {}={}",
                        selected.len(),
                        table.len(),
                        input.display(),
                        key,
                        value
                    ));
                }
                None => {
                    let indices = select_indices(&table, key, value);
                    for index in &indices {
                        println!("{}", index);
                    }
                    logger.info(format!(
                        "Found {} rows in {} where {}={}",
                        indices.len(),
                        input.display(),
                        key,
                        value
                    ));
                }
            }
        }

        Command::Mail {
            from,
            to,
            subject,
            body,
            ..
        } => {
            let email = Email::new(
                from.as_str(),
                Recipients::from(to.clone()),
                subject.as_str(),
                body.as_str(),
            );
            send_email(&config.mail, &email)?;
            logger.info(format!(
                "Sent '{}' to {}",
                subject,
                email.to.addresses().join(", ")
            ));
        }

        Command::Info => {
            println!("hostname:  {}", hostname()?);
            println!("date:      {}", today_as_str());
            println!("timestamp: {}", ts());
            logger.info("Printed host info");
        }
    }
    Ok(())
}

fn without_nbsp(record: &Record) -> Record {
    record
        .iter()
        .map(|(key, value)| (fix_nbsp(key), fix_nbsp(value)))
        .collect()
}

/// Map an error to the appropriate exit code.
fn error_to_exit_code(error: &KickshawsError) -> u8 {
    match error {
        KickshawsError::InvalidArgument(_) | KickshawsError::Address(_) => EXIT_CONFIG_ERROR,
        KickshawsError::Io(_)
        | KickshawsError::Csv(_)
        | KickshawsError::Json(_)
        | KickshawsError::InvalidInputType(_)
        | KickshawsError::EncodingExhausted
        | KickshawsError::MalformedSyntax(_)
        | KickshawsError::SchemaMismatch { .. }
        | KickshawsError::NotASequence(_)
        | KickshawsError::EmptyTable
        | KickshawsError::Logger(_) => EXIT_IO_ERROR,
        KickshawsError::Mail(_)
        | KickshawsError::Smtp(_)
        | KickshawsError::Http(_)
        | KickshawsError::IncompleteBody { .. } => EXIT_RUNTIME_ERROR,
    }
}
