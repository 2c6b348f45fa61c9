//! srvsvc-decode -- decode captured SRVSVC stubs.
//!
//! Usage:
//!   srvsvc-decode decode --opnum 21 --direction response stub.hex
//!   srvsvc-decode exchange --opnum 16 --request req.hex --response resp.hex
//!   srvsvc-decode ops                  # List known operations
//!   srvsvc-decode fields               # List field filter names

use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};

use srvsvc_cli::config::{CliConfig, InputEncoding, OutputFormat};
use srvsvc_cli::{decode_input, exit_code, expand_tilde, read_input, render, usage_exit_code};
use srvsvc_dissector::{Direction, Dissector, Exchange, Frame};
use srvsvc_ndr::{ByteOrder, DataRepresentation};

#[derive(Parser)]
#[command(name = "srvsvc-decode", about = "Decode DCE/RPC server service stubs")]
struct Cli {
    /// Path to config file
    #[arg(short, long, default_value = "~/.srvsvc/config.toml")]
    config: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode a single request or response stub
    Decode {
        /// Operation number from the RPC header
        #[arg(long)]
        opnum: u16,
        /// request or response
        #[arg(long)]
        direction: Direction,
        /// Offset of the first body byte within the stub
        #[arg(long, default_value_t = 0)]
        offset: usize,
        /// Input file, or - for stdin
        input: Option<PathBuf>,
        #[command(flatten)]
        opts: DecodeOpts,
    },
    /// Decode a request and its response sharing one exchange
    Exchange {
        #[arg(long)]
        opnum: u16,
        #[arg(long)]
        request: PathBuf,
        #[arg(long)]
        response: PathBuf,
        #[command(flatten)]
        opts: DecodeOpts,
    },
    /// List known operations
    Ops,
    /// List field filter names
    Fields,
}

/// Overrides for the `[decoder]` and `[output]` config sections.
#[derive(Args)]
struct DecodeOpts {
    /// Integers are big endian
    #[arg(long)]
    big_endian: bool,
    /// Layout profile: legacy or published
    #[arg(long)]
    profile: Option<String>,
    #[arg(long, value_enum)]
    encoding: Option<InputEncoding>,
    #[arg(long, value_enum)]
    format: Option<OutputFormat>,
}

/// Settings after merging command-line overrides into the config file.
struct Settings {
    dissector: Dissector,
    drep: DataRepresentation,
    encoding: InputEncoding,
    format: OutputFormat,
}

impl Settings {
    fn resolve(cfg: &CliConfig, opts: &DecodeOpts) -> anyhow::Result<Self> {
        let profile = opts.profile.as_deref().unwrap_or(&cfg.decoder.profile);
        let dissector = Dissector::with_profile_name(profile)?;
        let order = if opts.big_endian || cfg.decoder.big_endian {
            ByteOrder::Big
        } else {
            ByteOrder::Little
        };
        Ok(Self {
            dissector,
            drep: DataRepresentation::from(order),
            encoding: opts.encoding.unwrap_or(cfg.output.encoding),
            format: opts.format.unwrap_or(cfg.output.format),
        })
    }

    fn frame(&self, input: Option<&Path>, opnum: u16, direction: Direction) -> anyhow::Result<Frame> {
        let text = read_input(input)?;
        let data = decode_input(&text, self.encoding)?;
        Ok(Frame::new(data, opnum, direction).with_drep(self.drep))
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "srvsvc_cli=info,srvsvc_decode=info,srvsvc_dissector=warn".into()
            }),
        )
        .init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // the exit status carries the outcome even if stderr is gone
            e.print().ok();
            std::process::exit(usage_exit_code(&e));
        }
    };
    let config_path = expand_tilde(&cli.config);
    let cfg = CliConfig::load_or_default(&config_path)?;

    match cli.command {
        Commands::Decode {
            opnum,
            direction,
            offset,
            input,
            opts,
        } => {
            let settings = Settings::resolve(&cfg, &opts)?;
            let frame = settings
                .frame(input.as_deref(), opnum, direction)?
                .with_offset(offset);
            tracing::info!(
                opnum,
                direction = %direction,
                bytes = frame.data.len(),
                profile = settings.dissector.profile().name,
                "decoding stub"
            );
            let d = settings.dissector.dissect(&frame, &mut Exchange::new());
            print!("{}", render(&d, settings.format)?);
            let code = exit_code(&d);
            if code != 0 {
                std::process::exit(code);
            }
        }
        Commands::Exchange {
            opnum,
            request,
            response,
            opts,
        } => {
            let settings = Settings::resolve(&cfg, &opts)?;
            let mut exchange = Exchange::new();
            let mut code = 0;
            for (path, direction) in [(&request, Direction::Request), (&response, Direction::Response)] {
                let frame = settings.frame(Some(path.as_path()), opnum, direction)?;
                let d = settings.dissector.dissect(&frame, &mut exchange);
                print!("{}", render(&d, settings.format)?);
                code = code.max(exit_code(&d));
            }
            tracing::info!(opnum, level = ?exchange.level(), "exchange decoded");
            if code != 0 {
                std::process::exit(code);
            }
        }
        Commands::Ops => print!("{}", srvsvc_cli::list_operations()),
        Commands::Fields => print!("{}", srvsvc_cli::list_fields()),
    }

    Ok(())
}
