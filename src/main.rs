use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tokio::sync::broadcast;

use threads_client::api::{
    Credentials, HttpService, ImageUpload, NewAccount, NewPost, PostEdit, ProfileEdit,
};
use threads_client::config::{Config, SessionStore};
use threads_client::coordinator::{Coordinator, Notice};
use threads_client::logging::init_tracing;
use threads_client::model::{FeedItem, Post, PostId, User, UserId};
use threads_client::store::Store;

#[derive(Debug, Parser)]
#[command(name = "threads", about = "Command-line client for a threads server")]
struct Cli {
    /// Config file (default: platform config dir)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    Login {
        username: String,
        #[arg(long, env = "THREADS_PASSWORD")]
        password: String,
    },
    Signup {
        username: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long, env = "THREADS_PASSWORD")]
        password: String,
    },
    Logout,
    /// Show the global feed
    Feed,
    /// Show a post with its replies
    Thread { id: String },
    /// Show a user's profile, posts and replies
    Profile { id: String },
    /// Update your profile
    EditProfile {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        bio: Option<String>,
        #[arg(long)]
        link: Option<String>,
        #[arg(long)]
        picture: Option<PathBuf>,
    },
    Post {
        content: String,
        #[arg(long)]
        image: Option<PathBuf>,
    },
    Reply {
        parent: String,
        content: String,
        #[arg(long)]
        image: Option<PathBuf>,
    },
    Edit {
        id: String,
        content: String,
        #[arg(long)]
        image: Option<PathBuf>,
    },
    Delete { id: String },
    Like { id: String },
    Unlike { id: String },
    Repost { id: String },
    Unrepost { id: String },
    Follow { id: String },
    Unfollow { id: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
    .context("loading configuration")?;

    let remote = Arc::new(HttpService::new(&config.api).context("creating API client")?);
    let coordinator = Coordinator::new(remote, Store::default())
        .with_session(SessionStore::new(config.token_path()));
    let mut notices = coordinator.subscribe();

    let signed_in = if restores_session(&cli.command) {
        match coordinator.restore_session().await {
            Ok(user) => user,
            Err(err) if !requires_session(&cli.command) => {
                tracing::warn!(error = %err, "session not restored, continuing signed out");
                None
            }
            Err(err) => return Err(err).context("restoring session"),
        }
    } else {
        None
    };
    if requires_session(&cli.command) && signed_in.is_none() {
        bail!("not signed in; run `threads login <username>` first");
    }

    let outcome = run(&coordinator, cli.command).await;
    print_notices(&mut notices);
    outcome
}

/// Session commands manage the saved token themselves and must work offline.
fn restores_session(command: &Command) -> bool {
    !matches!(
        command,
        Command::Login { .. } | Command::Signup { .. } | Command::Logout
    )
}

fn requires_session(command: &Command) -> bool {
    !matches!(
        command,
        Command::Login { .. }
            | Command::Signup { .. }
            | Command::Logout
            | Command::Feed
            | Command::Thread { .. }
            | Command::Profile { .. }
    )
}

async fn run(coordinator: &Coordinator<HttpService>, command: Command) -> Result<()> {
    match command {
        Command::Login { username, password } => {
            let user = coordinator
                .sign_in(Credentials { username, password })
                .await?;
            println!("Signed in as @{}", user.username);
        }
        Command::Signup {
            username,
            name,
            email,
            password,
        } => {
            let user = coordinator
                .sign_up(NewAccount {
                    name,
                    username,
                    email,
                    password,
                })
                .await?;
            println!("Welcome, @{}", user.username);
        }
        Command::Logout => {
            coordinator.sign_out()?;
            println!("Signed out");
        }
        Command::Feed => {
            coordinator.load_feed().await?;
            let feed = coordinator.store().select(|s| s.post.feed.clone());
            for item in &feed {
                print_item(item);
            }
        }
        Command::Thread { id } => {
            coordinator.load_thread(&PostId::from(id)).await?;
            if let Some(thread) = coordinator.store().select(|s| s.post.thread.clone()) {
                print_post(&thread.post, "");
                for reply in &thread.replies {
                    print_post(reply, "    ");
                }
            }
        }
        Command::Profile { id } => {
            coordinator.load_profile(&UserId::from(id)).await?;
            let profile = coordinator.store().select(|s| s.profile.clone());
            if let Some(user) = &profile.user {
                print_user(user);
            }
            for item in &profile.items {
                print_item(item);
            }
            if !profile.replies.is_empty() {
                println!("-- replies --");
                for reply in &profile.replies {
                    print_post(reply, "");
                }
            }
        }
        Command::EditProfile {
            name,
            bio,
            link,
            picture,
        } => {
            let edit = ProfileEdit {
                name,
                bio,
                link,
                display_picture: picture.as_deref().map(read_image).transpose()?,
            };
            let user = coordinator.update_profile(edit).await?;
            print_user(&user);
        }
        Command::Post { content, image } => {
            let image = image.as_deref().map(read_image).transpose()?;
            let post = coordinator.create_post(NewPost { content, image }).await?;
            print_post(&post, "");
        }
        Command::Reply {
            parent,
            content,
            image,
        } => {
            let image = image.as_deref().map(read_image).transpose()?;
            let reply = coordinator
                .create_reply(&PostId::from(parent), NewPost { content, image })
                .await?;
            print_post(&reply, "");
        }
        Command::Edit { id, content, image } => {
            let image = image.as_deref().map(read_image).transpose()?;
            let post = coordinator
                .edit_post(&PostId::from(id), PostEdit { content, image })
                .await?;
            print_post(&post, "");
        }
        Command::Delete { id } => {
            coordinator.delete_post(&PostId::from(id)).await?;
            println!("Deleted");
        }
        Command::Like { id } => coordinator.like(&PostId::from(id)).await?,
        Command::Unlike { id } => coordinator.unlike(&PostId::from(id)).await?,
        Command::Repost { id } => {
            let repost = coordinator.repost(&PostId::from(id)).await?;
            println!("Reposted ({})", repost.id);
        }
        Command::Unrepost { id } => coordinator.unrepost(&PostId::from(id)).await?,
        Command::Follow { id } => coordinator.follow(&UserId::from(id)).await?,
        Command::Unfollow { id } => coordinator.unfollow(&UserId::from(id)).await?,
    }
    Ok(())
}

fn read_image(path: &Path) -> Result<ImageUpload> {
    let bytes = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_string());
    Ok(ImageUpload::new(file_name, bytes))
}

fn print_notices(notices: &mut broadcast::Receiver<Notice>) {
    while let Ok(notice) = notices.try_recv() {
        eprintln!("! {}", notice.message);
    }
}

fn print_item(item: &FeedItem) {
    match item {
        FeedItem::Post(post) => print_post(post, ""),
        FeedItem::Repost(repost) => {
            println!("↻ @{} reposted", repost.repost_creator.username);
            print_post(&repost.post, "  ");
        }
    }
}

fn print_post(post: &Post, indent: &str) {
    println!(
        "{}[{}] @{} · {} · ♥ {} · {} replies",
        indent,
        post.id,
        post.creator.username,
        post.created_at.format("%Y-%m-%d %H:%M"),
        post.likes,
        post.children.len()
    );
    for line in post.content.lines() {
        println!("{}  {}", indent, line);
    }
    if let Some(image) = &post.image {
        println!("{}  [image] {}", indent, image.url);
    }
}

fn print_user(user: &User) {
    println!("{} (@{})", user.name, user.username);
    if !user.bio.is_empty() {
        println!("{}", user.bio);
    }
    if let Some(link) = &user.link {
        println!("{}", link);
    }
    println!(
        "{} followers · {} following",
        user.followers.len(),
        user.following
    );
}
