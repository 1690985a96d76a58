use anyhow::{Context, Result, anyhow, bail};
use clap::{Arg, ArgAction, ArgMatches, Command};
use log::{LevelFilter, info};
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};

use bxml::decoder::DecoderExt;
use bxml::{
    ChoiceDecoder, DateDecoder, Decoder, DecoderSettings, ElementName, Event, EventStream,
    GenericValueDecoder, PrimitiveArray, PrimitiveListDecoder, Property, SequenceDecoder, Value,
};
use std::fs::File;
use std::io::{self, Read, Write};
use std::path::PathBuf;

struct BxmlDump {
    input: Option<PathBuf>,
    generic: bool,
    settings: DecoderSettings,
    dates: Vec<ElementName>,
    lists: Vec<ElementName>,
    verbosity_level: Option<LevelFilter>,
}

fn element_names(matches: &ArgMatches, id: &str) -> Result<Vec<ElementName>> {
    matches
        .get_many::<String>(id)
        .into_iter()
        .flatten()
        .map(|raw| {
            raw.parse::<ElementName>()
                .map_err(|e| anyhow!("invalid element name for --{}: {}", id, e))
        })
        .collect()
}

/// One `{"name": value}` object per child, in document order. Repeated names stay separate.
fn properties_to_json(properties: &[Property]) -> serde_json::Value {
    properties
        .iter()
        .map(|(name, value)| {
            let value = value
                .as_ref()
                .map_or(serde_json::Value::Null, serde_json::Value::from);
            let mut entry = serde_json::Map::new();
            entry.insert(name.to_string(), value);
            serde_json::Value::Object(entry)
        })
        .collect()
}

impl BxmlDump {
    pub fn from_cli_matches(matches: &ArgMatches) -> Result<Self> {
        let input = match matches.get_one::<String>("INPUT").map(String::as_str) {
            None | Some("-") => None,
            Some(path) => Some(PathBuf::from(path)),
        };

        let mut settings =
            DecoderSettings::new().skip_unexpected_content(!matches.get_flag("strict"));
        if let Some(format) = matches.get_one::<String>("date-format") {
            settings = settings.date_format(format.as_str());
        }

        let verbosity_level = match matches.get_count("verbose") {
            0 => None,
            1 => Some(LevelFilter::Info),
            2 => Some(LevelFilter::Debug),
            3 => Some(LevelFilter::Trace),
            _ => {
                eprintln!("using more than  -vvv does not affect verbosity level");
                Some(LevelFilter::Trace)
            }
        };

        Ok(BxmlDump {
            input,
            generic: matches.get_flag("generic"),
            settings,
            dates: element_names(matches, "date")?,
            lists: element_names(matches, "list")?,
            verbosity_level,
        })
    }

    fn read_events(&self) -> Result<Vec<Event>> {
        let mut raw = String::new();
        match &self.input {
            Some(path) => {
                File::open(path)
                    .with_context(|| format!("failed to open `{}`", path.display()))?
                    .read_to_string(&mut raw)
                    .with_context(|| format!("failed to read `{}`", path.display()))?;
            }
            None => {
                io::stdin()
                    .read_to_string(&mut raw)
                    .context("failed to read stdin")?;
            }
        }

        serde_json::from_str(&raw).context("input is not a JSON array of events")
    }

    /// Decoders for the children named on the command line.
    fn registered_decoders(&self) -> ChoiceDecoder<Value> {
        let mut registered = ChoiceDecoder::new();
        for name in &self.dates {
            registered = registered
                .with_option(DateDecoder::with_settings(name.clone(), &self.settings).map(Value::Date));
        }
        for name in &self.lists {
            registered = registered.with_option(
                PrimitiveListDecoder::<f64>::with_settings(name.clone(), &self.settings)
                    .map(|values| Value::Array(PrimitiveArray::Double(values))),
            );
        }
        registered
    }

    pub fn run(&self) -> Result<()> {
        if let Some(level) = self.verbosity_level {
            TermLogger::init(
                level,
                Config::default(),
                TerminalMode::Stderr,
                ColorChoice::Auto,
            )
            .context("failed to initialize logging")?;
        }

        let events = self.read_events()?;
        if events.is_empty() {
            bail!("the event stream is empty");
        }
        info!("decoding {} event(s)", events.len());

        let mut stream = EventStream::new(events)?;
        let output = if self.generic {
            let value = GenericValueDecoder::default().decode(&mut stream)?;
            value
                .as_ref()
                .map_or(serde_json::Value::Null, serde_json::Value::from)
        } else {
            let decoder = SequenceDecoder::new(
                None,
                self.registered_decoders(),
                GenericValueDecoder::default(),
            );
            let properties = decoder.decode(&mut stream)?.unwrap_or_default();
            properties_to_json(&properties)
        };

        if !stream.is_last() {
            info!(
                "stopped at event {} of {}",
                stream.index() + 1,
                stream.events().len()
            );
        }

        let stdout = io::stdout();
        let mut out = stdout.lock();
        serde_json::to_writer_pretty(&mut out, &output)?;
        writeln!(out)?;
        Ok(())
    }
}

fn main() -> Result<()> {
    let matches = Command::new("BXML Dump")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Decodes a JSON-serialized BXML event stream and prints the values as JSON")
        .arg(
            Arg::new("INPUT")
                .help("JSON array of events, `-` (or nothing) reads stdin")
                .index(1),
        )
        .arg(
            Arg::new("generic")
                .long("generic")
                .action(ArgAction::SetTrue)
                .help("Decode the root element as a single generic value"),
        )
        .arg(
            Arg::new("date")
                .long("date")
                .value_name("ELEMENT")
                .action(ArgAction::Append)
                .help("Decode children with this name as dates (repeatable)"),
        )
        .arg(
            Arg::new("list")
                .long("list")
                .value_name("ELEMENT")
                .action(ArgAction::Append)
                .help("Decode children with this name as double arrays (repeatable)"),
        )
        .arg(
            Arg::new("strict")
                .long("strict")
                .action(ArgAction::SetTrue)
                .help("Fail on unexpected content after a primitive or list value instead of skipping it"),
        )
        .arg(
            Arg::new("date-format")
                .long("date-format")
                .value_name("FORMAT")
                .help("strftime-style format for --date elements"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .action(ArgAction::Count)
                .help("Sets debug prints level for the application: -v info, -vv debug, -vvv trace"),
        )
        .get_matches();

    BxmlDump::from_cli_matches(&matches)?.run()
}
