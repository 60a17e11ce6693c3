//! `postapp`: command-line front end for the PostApp client core.

use std::path::PathBuf;

use anyhow::Context;
use clap::{ArgAction, Parser, Subcommand};
use serde::Serialize;

use postapp_client::commands::{self, OpenedPost, PostDto, PostListDto, ReadingGoalDto};
use postapp_client::config::{Backend, ClientConfig};
use postapp_client::AppState;
use postapp_shared::{NewPost, PostId};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Talk to a postapp-server at this URL instead of the built-in mock
    #[arg(short, long, value_name = "URL")]
    server: Option<String>,

    /// Local database holding the reading goal
    #[arg(long, value_name = "FILE")]
    db: Option<PathBuf>,

    /// Print JSON instead of text
    #[arg(short, long, action = ArgAction::SetTrue)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Clone, Debug)]
enum Command {
    /// List posts, newest first
    List,

    /// Open a post and count it toward today's reading goal
    Show { id: PostId },

    /// Publish a new post
    Create {
        #[arg(short, long)]
        title: String,
        #[arg(long)]
        subtitle: String,
        #[arg(short, long)]
        body: String,
        /// Rich-text body, stored as given
        #[arg(long)]
        html: Option<String>,
    },

    /// Delete a post
    Delete { id: PostId },

    /// Show today's reading goal progress
    Goal,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    postapp_client::init_tracing();

    let cli = Cli::parse();

    let mut config = ClientConfig::from_env();
    if let Some(url) = cli.server {
        config.backend = Backend::Http;
        config.server_url = url;
    }
    if let Some(path) = cli.db {
        config.db_path = Some(path);
    }

    let state = AppState::from_config(config).context("Failed to initialize client")?;

    match cli.command {
        Command::List => {
            let list = commands::list_posts(&state).await;
            output(cli.json, &list, print_list)?;
        }
        Command::Show { id } => {
            let opened = commands::open_post(&state, id).await?;
            output(cli.json, &opened, print_opened)?;
        }
        Command::Create {
            title,
            subtitle,
            body,
            html,
        } => {
            let mut new_post = NewPost::new(title, subtitle, body);
            new_post.html_body = html;
            let post = commands::create_post(&state, new_post).await?;
            output(cli.json, &post, |p| println!("Created {}  {}", p.id, p.title))?;
        }
        Command::Delete { id } => {
            commands::delete_post(&state, id).await?;
            if cli.json {
                println!("{}", serde_json::json!({ "deleted": id }));
            } else {
                println!("Deleted {id}");
            }
        }
        Command::Goal => {
            let goal = commands::reading_goal(&state);
            output(cli.json, &goal, print_goal)?;
        }
    }

    Ok(())
}

fn output<T: Serialize>(json: bool, value: &T, text: impl Fn(&T)) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        text(value);
    }
    Ok(())
}

fn print_list(list: &PostListDto) {
    if let Some(error) = &list.error {
        eprintln!("warning: {error}");
    }
    if list.posts.is_empty() {
        println!("No posts yet.");
        return;
    }
    for post in &list.posts {
        let marker = if post.is_read { "✓" } else { " " };
        println!("{marker} {}  {}", post.id, post.title);
        println!("    {}", post.subtitle);
    }
}

fn print_opened(opened: &OpenedPost) {
    let post: &PostDto = &opened.post;
    println!("{}\n{}\n{}\n", post.title, post.subtitle, post.created_at);
    println!("{}", post.body);
    if opened.goal_reached {
        println!("\nDaily reading goal reached!");
    }
}

fn print_goal(goal: &ReadingGoalDto) {
    println!(
        "{}/{} posts read today ({}%)",
        goal.read_count, goal.daily_goal, goal.percent
    );
    println!("{}", goal.message);
}
