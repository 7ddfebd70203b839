mod commands;
mod core;
mod matrix;
mod release;
mod storage;
mod utils;

use clap::{Parser, Subcommand};
use crate::core::config::Config;
use crate::core::error::{CraneError, print_error};
use crate::core::exec::SystemRunner;

/// Build, checksum, upload, and publish versioned release binaries
#[derive(Parser)]
#[command(name = "crane")]
#[command(version, about, long_about = None)]
#[command(styles = get_styles())]
struct CraneCli {
  #[command(subcommand)]
  command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
  /// Print the resolved build metadata
  Version {
    /// Output the metadata record as JSON
    #[arg(long)]
    json: bool,
  },

  /// Rewrite imports and formatting in the configured packages
  Fmt,

  /// Run the static checker over the configured packages
  Vet,

  /// Run the style linter over the configured packages
  Lint,

  /// Run the code generation hook
  Gen,

  /// Compile matrix entries into dist/
  Build {
    /// Name of the matrix entry to build (default: all entries)
    name: Option<String>,
  },

  /// Checksum and upload built artifacts to a release channel
  Push {
    /// Name of the artifact directory to push (default: all under dist/)
    name: Option<String>,
    /// Release channel from the [buckets] table
    #[arg(long, default_value = "dev")]
    bucket: String,
    /// Output the push report(s) as JSON
    #[arg(long)]
    json: bool,
  },

  /// Point the release channel's registry at the current version
  #[command(name = "update_registry")]
  UpdateRegistry {
    /// Release channel from the [buckets] table
    #[arg(long, default_value = "dev")]
    bucket: String,
  },

  /// Build and install the binary into the local toolchain's bin path
  Install,
}

fn get_styles() -> clap::builder::Styles {
  clap::builder::Styles::styled()
    .usage(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Yellow))),
    )
    .header(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Yellow))),
    )
    .literal(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))))
    .invalid(
      anstyle::Style::new()
        .bold()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red))),
    )
    .error(
      anstyle::Style::new()
        .bold()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red))),
    )
    .valid(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))),
    )
    .placeholder(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::White))))
}

fn main() {
  let cli = match CraneCli::try_parse() {
    Ok(cli) => cli,
    Err(err) => {
      // Unknown tokens get the uniform error treatment; everything else
      // (help, --version, bad flags) keeps clap's own rendering.
      if err.kind() == clap::error::ErrorKind::InvalidSubcommand {
        let token = std::env::args().nth(1).unwrap_or_default();
        handle_error(CraneError::UnknownCommand { token });
      }
      err.exit();
    }
  };

  let cwd = match std::env::current_dir() {
    Ok(dir) => dir,
    Err(e) => {
      eprintln!("Error: Failed to get current directory: {}", e);
      std::process::exit(1);
    }
  };

  let config = match Config::load(&cwd) {
    Ok(config) => config,
    Err(e) => handle_error(e),
  };

  let runner = SystemRunner;

  let result = match cli.command {
    None => commands::run_default(&config, &runner),
    Some(Commands::Version { json }) => commands::run_version(&config, &runner, json),
    Some(Commands::Fmt) => commands::run_fmt(&config, &runner),
    Some(Commands::Vet) => commands::run_vet(&config, &runner),
    Some(Commands::Lint) => commands::run_lint(&config, &runner),
    Some(Commands::Gen) => commands::run_gen(&config),
    Some(Commands::Build { name }) => commands::run_build(&config, &runner, name),
    Some(Commands::Push { name, bucket, json }) => commands::run_push(&config, &runner, name, &bucket, json),
    Some(Commands::UpdateRegistry { bucket }) => commands::run_update_registry(&config, &runner, &bucket),
    Some(Commands::Install) => commands::run_install(&config, &runner),
  };

  if let Err(err) = result {
    handle_error(err);
  }
}

fn handle_error(err: CraneError) -> ! {
  print_error(&err);
  std::process::exit(err.exit_status());
}
