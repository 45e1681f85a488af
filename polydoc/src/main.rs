use std::{
  fs,
  io::{self, Read, Write},
};

use color_eyre::eyre::{Context, Result, bail};
use log::{LevelFilter, info};
use polydoc::{
  cli::{Cli, Commands},
  config::Config,
  render,
};
use polydoc_commonmark::process_doc_tokens;

fn main() -> Result<()> {
  color_eyre::install()?;

  let cli = Cli::parse_args();

  env_logger::Builder::new()
    .filter_level(if cli.verbose {
      LevelFilter::Debug
    } else {
      LevelFilter::Info
    })
    .write_style(env_logger::WriteStyle::Always)
    .init();

  match &cli.command {
    Commands::Init {
      output,
      format,
      force,
    } => {
      if output.exists() && !force {
        bail!(
          "Configuration file already exists: {}. Use --force to overwrite.",
          output.display()
        );
      }

      if let Some(parent) = output.parent()
        && !parent.as_os_str().is_empty()
        && !parent.exists()
      {
        fs::create_dir_all(parent).wrap_err_with(|| {
          format!("Failed to create directory: {}", parent.display())
        })?;
        info!("Created directory: {}", parent.display());
      }

      Config::generate_default_config(format, output).wrap_err_with(|| {
        format!("Failed to generate configuration file: {}", output.display())
      })?;
      info!("Configuration file created: {}", output.display());
    },

    Commands::Render {
      input,
      output,
      language,
      json,
    } => {
      let config = Config::load(&cli.config_files, &cli.config_overrides)?;
      let rendered =
        render::render_to_string(&config, input, language.as_deref(), *json)?;

      if let Some(output) = output {
        fs::write(output, &rendered).wrap_err_with(|| {
          format!("Failed to write {}", output.display())
        })?;
        info!("Wrote {}", output.display());
      } else {
        write_stdout(&rendered)?;
      }
    },

    Commands::Build {
      input_dir,
      output_dir,
      language,
      jobs,
    } => {
      let mut config = Config::load(&cli.config_files, &cli.config_overrides)?;
      if let Some(input_dir) = input_dir {
        config.input_dir = Some(input_dir.clone());
      }
      if let Some(output_dir) = output_dir {
        config.output_dir.clone_from(output_dir);
      }
      if jobs.is_some() {
        config.jobs = *jobs;
      }
      config.validate()?;

      let Some(input_dir) = config.input_dir.clone() else {
        bail!("No input directory given. Use --input-dir or set input_dir.");
      };

      let pages = render::build(&config, &input_dir, language)?;
      info!(
        "Rendered {pages} pages into {}",
        config.output_dir.display()
      );
    },

    Commands::Tokens {
      language,
      pre,
      text,
    } => {
      let text = if let Some(text) = text {
        text.clone()
      } else {
        let mut buffer = String::new();
        io::stdin()
          .read_to_string(&mut buffer)
          .wrap_err("Failed to read stdin")?;
        buffer
      };
      write_stdout(&process_doc_tokens(Some(language), *pre, &text))?;
    },
  }

  Ok(())
}

fn write_stdout(content: &str) -> Result<()> {
  let mut stdout = io::stdout().lock();
  stdout.write_all(content.as_bytes())?;
  if !content.ends_with('\n') {
    stdout.write_all(b"\n")?;
  }
  stdout.flush()?;
  Ok(())
}
