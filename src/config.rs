//! Command-line configuration of a translation run

use crate::error::{RunResult, TranslationRunError};
use crate::mt::{HubCredentials, LanguagePair, TranslatorKind};
use crate::platform::PlatformCredentials;
use crate::translation::DEFAULT_BATCH_SIZE;
use clap::{Arg, ArgAction, ArgMatches, Command};
use std::path::{Path, PathBuf};
use std::str::FromStr;

pub const SOURCE_LANGUAGES: [&str; 4] = ["en", "de", "fr", "es"];
pub const TARGET_LANGUAGES: [&str; 4] = ["en", "fr", "es", "de"];

/// Layout of the input dataset file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    /// Flat platform export, normalized before translation
    Platform,
    /// Canonical dataset, used as is
    Canonical,
}

impl InputFormat {
    pub const VALUES: [&'static str; 2] = ["platform", "canonical"];
}

impl FromStr for InputFormat {
    type Err = TranslationRunError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "platform" => Ok(InputFormat::Platform),
            "canonical" => Ok(InputFormat::Canonical),
            other => Err(TranslationRunError::Config(format!(
                "Unknown dataset format '{}'",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RunConfig {
    pub path: PathBuf,
    pub api: TranslatorKind,
    pub languages: LanguagePair,
    pub platform: PlatformCredentials,
    /// `None` when the environment should provide them
    pub hub_credentials: Option<HubCredentials>,
    pub save: bool,
    pub format: InputFormat,
    pub batch_size: usize,
}

pub fn cli() -> Command {
    Command::new("dataset-translation")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Translate a chatbot dataset and import it into the bot platform")
        .arg(
            Arg::new("path")
                .long("path")
                .short('p')
                .help("Path of the dataset file")
                .required(true),
        )
        .arg(
            Arg::new("api")
                .long("api")
                .short('a')
                .help("Translation backend")
                .value_parser(TranslatorKind::VALUES)
                .default_value("translationhub"),
        )
        .arg(
            Arg::new("source")
                .long("source")
                .short('s')
                .help("Source language")
                .value_parser(SOURCE_LANGUAGES)
                .default_value("en"),
        )
        .arg(
            Arg::new("target")
                .long("target")
                .short('t')
                .help("Target language")
                .value_parser(TARGET_LANGUAGES)
                .default_value("fr"),
        )
        .arg(required("user-slug", "User slug of the bot owner"))
        .arg(required("bot-slug", "Slug of the bot"))
        .arg(required("version-slug", "Version of the bot"))
        .arg(required("developer-token", "Developer token of the bot"))
        .arg(required("bot-client-id", "OAuth client id of the bot"))
        .arg(required("bot-client-secret", "OAuth client secret of the bot"))
        .arg(
            Arg::new("client-id")
                .long("client-id")
                .help("Translation hub client id (default: $TRANSLATION_HUB_CLIENT_ID)"),
        )
        .arg(
            Arg::new("client-secret")
                .long("client-secret")
                .help("Translation hub client secret (default: $TRANSLATION_HUB_CLIENT_SECRET)"),
        )
        .arg(
            Arg::new("save")
                .long("save")
                .help("Save the translated dataset next to the input file")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("format")
                .long("format")
                .help("Layout of the input file")
                .value_parser(InputFormat::VALUES)
                .default_value("platform"),
        )
        .arg(
            Arg::new("batch-size")
                .long("batch-size")
                .help("Number of texts per translation request")
                .value_parser(clap::value_parser!(usize))
                .default_value("10"),
        )
}

fn required(name: &'static str, help: &'static str) -> Arg {
    Arg::new(name).long(name).help(help).required(true)
}

impl RunConfig {
    pub fn from_matches(matches: &ArgMatches) -> RunResult<Self> {
        let string = |name: &str| -> RunResult<String> {
            matches
                .get_one::<String>(name)
                .cloned()
                .ok_or_else(|| TranslationRunError::Config(format!("Missing --{}", name)))
        };

        let batch_size = matches
            .get_one::<usize>("batch-size")
            .copied()
            .unwrap_or(DEFAULT_BATCH_SIZE);
        if batch_size == 0 {
            return Err(TranslationRunError::Config(
                "--batch-size must be at least 1".to_string(),
            ));
        }

        let hub_credentials = match (
            matches.get_one::<String>("client-id"),
            matches.get_one::<String>("client-secret"),
        ) {
            (Some(id), Some(secret)) => Some(HubCredentials::new(id, secret)),
            (None, None) => None,
            _ => {
                return Err(TranslationRunError::Config(
                    "--client-id and --client-secret must be given together".to_string(),
                ));
            }
        };

        Ok(Self {
            path: PathBuf::from(string("path")?),
            api: string("api")?.parse()?,
            languages: LanguagePair::new(&string("source")?, &string("target")?)?,
            platform: PlatformCredentials {
                user_slug: string("user-slug")?,
                bot_slug: string("bot-slug")?,
                version_slug: string("version-slug")?,
                developer_token: string("developer-token")?,
                bot_client_id: string("bot-client-id")?,
                bot_client_secret: string("bot-client-secret")?,
            },
            hub_credentials,
            save: matches.get_flag("save"),
            format: string("format")?.parse()?,
            batch_size,
        })
    }

    pub fn output_path(&self) -> PathBuf {
        translated_output_path(&self.path, &self.languages.target, self.api)
    }
}

/// `<path without .json>-<target>-translated-<api>.json`
pub fn translated_output_path(path: &Path, target: &str, api: TranslatorKind) -> PathBuf {
    let path = path.to_string_lossy();
    let stem = path.strip_suffix(".json").unwrap_or(&path);
    PathBuf::from(format!("{}-{}-translated-{}.json", stem, target, api.as_str()))
}
