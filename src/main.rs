mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use cli::{download_target, CliArgs, Command};
use nightconv::api::ConversionRequest;
use nightconv::{ClientConfig, NightconvClient};

#[tokio::main]
async fn main() -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("setting default subscriber failed")?;

    let args = CliArgs::parse();
    let config = ClientConfig::from_env()?;
    tracing::debug!("using server {}", config.base_url);
    let client = NightconvClient::new(&config)?;

    match args.command {
        Command::Convert { path, format, pitch, tempo, download } => {
            let audio = tokio::fs::read(&path)
                .await
                .with_context(|| format!("reading {}", path.display()))?;
            let filename = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| "audio".to_string());

            let request = ConversionRequest::new(filename, format, pitch, tempo, audio);
            let file_id = client
                .convert_audio(&request, |status| println!("{}", status))
                .await?;
            println!("done: {}", file_id);

            let info = client.get_audio_info(&file_id).await?;
            println!("{}", client.file_url(&file_id, &info.filename));

            if let Some(dir) = download {
                let bytes = client.download_file(&file_id, &info.filename).await?;
                let target = download_target(&dir, &info.filename, &file_id, format);
                tokio::fs::write(&target, &bytes)
                    .await
                    .with_context(|| format!("writing {}", target.display()))?;
                println!("saved {} bytes to {}", bytes.len(), target.display());
            }
        }
        Command::Info { file_id } => {
            let info = client.get_audio_info(&file_id).await?;
            println!("filename:     {}", info.filename);
            println!("content type: {}", info.content_type);
            println!("length:       {} bytes", info.length);
            match info.expires_at() {
                Some(ts) => println!("expires:      {}", ts.to_rfc3339()),
                None => println!("expires:      {}", info.expire_time),
            }
        }
        Command::Recents => {
            for file_id in client.get_recent_files().await? {
                println!("{}", file_id);
            }
        }
    }

    Ok(())
}
