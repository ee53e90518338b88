use std::path::PathBuf;

use clap::{Parser, Subcommand};
use openlist::{files::ListReq, reqwest::Body, OpenList};
use tokio_util::io::ReaderStream;
use tracing::info;

use crate::config::AppConfig;

mod config;

/// Talk to an OpenList server configured through `OPENLIST_*` environment
/// variables (or a `.env` file).
#[derive(Parser, Debug)]
#[command(name = "openlist", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check that the server is up.
    Ping,
    /// Log in and print the token.
    Login,
    /// List a folder.
    Ls {
        #[arg(default_value = "/")]
        path: String,
        /// Bypass the server-side listing cache.
        #[arg(long)]
        refresh: bool,
    },
    /// Create a folder, with parents.
    Mkdir { path: String },
    /// Delete files or folders in `dir`.
    Rm {
        dir: String,
        #[arg(required = true)]
        names: Vec<String>,
    },
    /// Upload a local file to a remote path.
    Upload {
        local: PathBuf,
        remote: String,
        /// Stream the body instead of sending a multipart form.
        #[arg(long)]
        stream: bool,
        /// Wait for the upload instead of running it as a server task.
        #[arg(long)]
        no_task: bool,
    },
    /// Print the public site settings.
    Settings,
}

async fn ls(openlist: &OpenList, path: String, refresh: bool) -> Result<(), openlist::Error> {
    let listing = openlist
        .fs()
        .list(&ListReq::new(&path).refresh(refresh))
        .await?
        .data;

    for item in listing.content {
        let kind = if item.is_dir { "dir" } else { "file" };
        println!("{kind:>4} {:>12} {}", item.size, item.name);
    }

    println!("{} items in {path}", listing.total);

    Ok(())
}

async fn upload(
    openlist: &OpenList,
    local: PathBuf,
    remote: &str,
    stream: bool,
    as_task: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let res = if stream {
        let file = tokio::fs::File::open(&local).await?;
        let body = Body::wrap_stream(ReaderStream::new(file));

        openlist.fs().stream_upload(remote, body, as_task).await?
    } else {
        let data = tokio::fs::read(&local).await?;

        openlist.fs().form_upload(remote, data, as_task).await?
    };

    match res.data.task {
        Some(task) => info!("queued upload task {} ({})", task.id, task.name),
        None => info!("uploaded {} to {remote}", local.display()),
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let config = AppConfig::default();
    let openlist = config.connect().await?;

    match cli.command {
        Command::Ping => println!("{}", openlist.public().ping().await?),
        Command::Login => match openlist.token() {
            Some(token) => println!("{token}"),
            None => eprintln!("set OPENLIST_USERNAME and OPENLIST_PASSWORD to log in"),
        },
        Command::Ls { path, refresh } => ls(&openlist, path, refresh).await?,
        Command::Mkdir { path } => {
            openlist.fs().mkdir(&path).await?;
        }
        Command::Rm { dir, names } => {
            let names = names.iter().map(String::as_str).collect::<Vec<_>>();
            openlist.fs().remove(&dir, &names).await?;
        }
        Command::Upload {
            local,
            remote,
            stream,
            no_task,
        } => upload(&openlist, local, &remote, stream, !no_task).await?,
        Command::Settings => {
            let settings = openlist.public().settings().await?.data;
            println!("{settings:#?}");
        }
    }

    Ok(())
}
