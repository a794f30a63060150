use anyhow::{bail, Context, Result};
use clap::Parser;
use client_core::{
    config::{load_settings, normalize_server_url},
    generate_for_selection, GenerateError, MeditationClient,
};
use shared::{
    domain::{selection_from_labels, Category},
    protocol::MeditationResult,
};
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(about = "Generate a guided meditation from the command line")]
struct Args {
    /// Base URL of the meditation backend. Overrides meditate.toml and env.
    #[arg(long)]
    server_url: Option<String>,
    /// Current emotion; repeat for several.
    #[arg(long = "emotion")]
    emotions: Vec<String>,
    /// Meditation goal; repeat for several.
    #[arg(long = "goal")]
    goals: Vec<String>,
    /// Desired outcome; repeat for several.
    #[arg(long = "outcome")]
    outcomes: Vec<String>,
    /// Print the selectable values for each category and exit.
    #[arg(long)]
    list: bool,
    /// Print a previously stored meditation instead of generating one.
    #[arg(long, conflicts_with_all = ["emotions", "goals", "outcomes"])]
    id: Option<i64>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();
    let args = Args::parse();

    if args.list {
        for category in Category::ALL {
            println!("{}: {}", category.label(), category.vocabulary().join(", "));
        }
        return Ok(());
    }

    let mut settings = load_settings();
    if let Some(server_url) = args.server_url {
        settings.server_url = normalize_server_url(&server_url);
    }

    let client = MeditationClient::new(&settings.server_url)
        .with_context(|| format!("invalid server url '{}'", settings.server_url))?;
    info!(server_url = %client.server_url(), "using meditation backend");

    let outcome = match args.id {
        Some(id) => client.get_meditation(id).await,
        None => {
            let selection = selection_from_labels(&args.emotions, &args.goals, &args.outcomes)?;
            generate_for_selection(&client, &selection).await
        }
    };

    match outcome {
        Ok(result) => {
            let audio_url = client.resolve_audio_url(&result.audio_url);
            print!("{}", render_result(&result, &audio_url));
            Ok(())
        }
        Err(err) => bail!("{}", failure_message(&err)),
    }
}

fn failure_message(err: &GenerateError) -> String {
    if err.is_retryable() {
        warn!(error = %err, "request failed; a retry may succeed");
        format!("{} (this may be temporary; try again)", err.user_message())
    } else {
        err.user_message()
    }
}

fn render_result(result: &MeditationResult, audio_url: &str) -> String {
    let mut out = String::new();
    if let Some(title) = result.display_title() {
        out.push_str(&format!("{title}\n"));
    }
    if let Some(duration) = result.duration_label() {
        out.push_str(&format!("Duration: {duration}\n"));
    }
    out.push_str(&format!("\n{}\n\nAudio: {audio_url}\n", result.script));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_optional_title_and_duration() {
        let result = MeditationResult {
            id: None,
            script: "Breathe in...".to_string(),
            audio_url: "/a.mp3".to_string(),
            title: Some("Calm Focus Meditation".to_string()),
            duration_seconds: Some(125),
        };
        assert_eq!(
            render_result(&result, "http://127.0.0.1:5000/a.mp3"),
            "Calm Focus Meditation\nDuration: 2:05\n\nBreathe in...\n\nAudio: http://127.0.0.1:5000/a.mp3\n"
        );
    }

    #[test]
    fn renders_script_only_when_metadata_is_absent() {
        let result = MeditationResult {
            id: None,
            script: "Breathe in...".to_string(),
            audio_url: "/a.mp3".to_string(),
            title: None,
            duration_seconds: None,
        };
        assert_eq!(
            render_result(&result, "/a.mp3"),
            "\nBreathe in...\n\nAudio: /a.mp3\n"
        );
    }

    #[test]
    fn parses_repeated_selection_flags() {
        let args = Args::parse_from([
            "desktop",
            "--emotion",
            "Happy",
            "--emotion",
            "Calm",
            "--goal",
            "Focus",
            "--outcome",
            "Mental Clarity",
        ]);
        assert_eq!(args.emotions, vec!["Happy", "Calm"]);
        assert_eq!(args.goals, vec!["Focus"]);
        assert_eq!(args.outcomes, vec!["Mental Clarity"]);
        assert!(!args.list);
        assert_eq!(args.id, None);
    }

    #[test]
    fn id_mode_excludes_selection_flags() {
        let args = Args::parse_from(["desktop", "--id", "7"]);
        assert_eq!(args.id, Some(7));
        assert!(Args::try_parse_from(["desktop", "--id", "7", "--goal", "Focus"]).is_err());
    }

    #[test]
    fn retryable_failures_carry_a_retry_hint() {
        let unreachable = GenerateError::transport("connection refused");
        assert_eq!(
            failure_message(&unreachable),
            "An error occurred: connection refused (this may be temporary; try again)"
        );
        let not_found = GenerateError::Rejected {
            status: 404,
            message: "Meditation 8 not found".to_string(),
        };
        assert_eq!(failure_message(&not_found), "Meditation 8 not found");
    }
}
