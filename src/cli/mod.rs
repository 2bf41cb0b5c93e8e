use crate::config::{Config, DEFAULT_CONFIG_PATH};
use crate::core::{FtpPublisher, Pipeline, PipelineOptions, PublishOutcome, Publisher};
use crate::extractors::{GoogleSheetSource, YouTubeDataApi};
use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "weekly-gallery")]
#[command(about = "Build the video gallery page from the spreadsheet and upload it")]
#[command(version)]
pub struct Cli {
    /// Config file
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    /// Where to write the page (overrides the config file)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Thumbnail used for rows without a video id
    #[arg(long)]
    pub placeholder_image: Option<String>,

    /// Write the page but do not upload it
    #[arg(long)]
    pub no_publish: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Config file contents with command line overrides applied.
    pub fn resolve_config(&self) -> Result<Config> {
        let mut config = Config::load(&self.config)?;
        if let Some(output) = &self.output {
            config.output = output.clone();
        }
        if let Some(placeholder) = &self.placeholder_image {
            config.placeholder_image = placeholder.clone();
        }
        if self.no_publish {
            config.ftp = None;
        }
        Ok(config)
    }

    pub async fn run(&self) -> Result<()> {
        let config = self.resolve_config()?;
        let timeout = Duration::from_secs(config.timeout);

        let source = GoogleSheetSource::new(config.source_url()?, timeout)?;
        let video_api = YouTubeDataApi::new(config.youtube.api_base.clone(), timeout)?;
        let publisher = config.ftp.clone().map(|ftp| {
            // FTP sessions get a little more room than single HTTP requests.
            Box::new(FtpPublisher::new(ftp, timeout + Duration::from_secs(10))) as Box<dyn Publisher>
        });

        let pipeline = Pipeline::new(
            Box::new(source),
            Box::new(video_api),
            publisher,
            PipelineOptions {
                api_key: config.youtube.api_key.clone(),
                placeholder_image: config.placeholder_image.clone(),
                page: config.page.clone(),
                output_path: config.output.clone(),
            },
        );

        let report = pipeline
            .run()
            .await
            .context("Could not build the gallery page")?;

        println!(
            "Done: {} ({} items, {} with metadata)",
            report.output_path.display(),
            report.items,
            report.enriched
        );
        match &report.publish {
            PublishOutcome::Published(target) => println!("Uploaded to {}", target),
            PublishOutcome::Skipped => println!("Upload skipped"),
            PublishOutcome::Failed(reason) => println!("Upload failed: {}", reason),
        }

        Ok(())
    }
}
