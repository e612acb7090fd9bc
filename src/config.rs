//! Mechanism for loading and sharing the emulation configuration

use crate::{candidate::EmulationSettings, numeric::Float, two_track::TwoTrackMatcher, Result};

use eyre::{ensure, format_err, WrapErr};

use std::{fs, path::Path, path::PathBuf, str::FromStr};

/// Emulation run configuration
#[derive(Clone, Debug, PartialEq)]
pub struct Configuration {
    /// File from which candidates are read
    pub input: PathBuf,

    /// File to which decisions and efficiencies are written
    pub output: PathBuf,

    /// Track pair to combination association, with its SUMPT tolerance
    pub matcher: TwoTrackMatcher,

    /// Whether the MASK flags of input tracks gate Hlt1TwoTrackMVA
    pub use_track_mask: bool,

    /// Number of candidates per scheduling batch
    pub batch_size: usize,
}
//
impl Configuration {
    /// Load the configuration from a file, check it, and print it out
    pub fn load(file_name: impl AsRef<Path>) -> Result<Self> {
        let file_name = file_name.as_ref();
        let config_str = fs::read_to_string(file_name)
            .wrap_err_with(|| format!("Could not read {}", file_name.display()))?;
        let config = Self::parse(&config_str)?;
        config.print();
        Ok(config)
    }

    /// Parse and check the configuration
    pub fn parse(config_str: &str) -> Result<Self> {
        // We will iterate over the configuration items. These should be the
        // first non-whitespace chunk of text on each line, the rest of the
        // line being free-form commentary. We will ignore blank lines.
        let mut config_iter = config_str
            .lines()
            .filter_map(|line| line.split_whitespace().next());

        // This closure fetches the next configuration item, tagging it with
        // the name of the configuration field which it is supposed to fill to
        // ease error reporting, and handling unexpected end-of-file too.
        let mut next_item = |name: &'static str| -> Result<ConfigItem> {
            config_iter
                .next()
                .map(|data| ConfigItem::new(name, data))
                .ok_or_else(|| format_err!("Missing configuration of {}", name))
        };

        // Decode the configuration items into concrete values
        let config = Configuration {
            input: next_item("input")?.parse::<PathBuf>()?,
            output: next_item("output")?.parse::<PathBuf>()?,
            matcher: TwoTrackMatcher::new(next_item("sum_pt_tol")?.parse::<Float>()?)
                .wrap_err("Invalid configuration of sum_pt_tol")?,
            use_track_mask: next_item("track_mask")?.parse_bool()?,
            batch_size: next_item("batch_size")?.parse::<usize>()?,
        };

        // Scheduling needs to make some progress on each batch
        ensure!(config.batch_size > 0, "Please use batches of at least one candidate");

        // Leftover items usually mean that the file is out of sync with this
        // version of the emulator
        ensure!(
            config_iter.next().is_none(),
            "Unexpected configuration items after batch_size"
        );

        Ok(config)
    }

    /// Year-independent emulation settings described by this configuration
    pub fn settings(&self) -> EmulationSettings {
        EmulationSettings {
            matcher: self.matcher,
            use_track_mask: self.use_track_mask,
        }
    }

    /// Display the configuration
    pub fn print(&self) {
        println!("INPUT          : {}", self.input.display());
        println!("OUTPUT         : {}", self.output.display());
        println!("SUMPT_TOL      : {}", self.matcher.sum_pt_tolerance());
        println!("TRACK_MASK     : {}", self.use_track_mask);
        println!("BATCH_SIZE     : {}", self.batch_size);
    }
}

/// A value from the configuration file, tagged with the struct field which it
/// is supposed to map for error reporting purposes.
struct ConfigItem<'data> {
    name: &'static str,
    data: &'data str,
}
//
impl<'data> ConfigItem<'data> {
    /// Build a config item from a struct field tag and raw iterator data
    fn new(name: &'static str, data: &'data str) -> Self {
        Self { name, data }
    }

    /// Parse this data using Rust's standard parsing logic
    fn parse<T: FromStr>(self) -> Result<T>
    where
        <T as FromStr>::Err: ::std::error::Error + Send + Sync + 'static,
    {
        self.data
            .parse::<T>()
            .wrap_err_with(|| format!("Could not parse configuration of {}", self.name))
    }

    /// Parse this data as a boolean, accepting the usual on/off spellings
    fn parse_bool(self) -> Result<bool> {
        match self.data.to_lowercase().as_str() {
            "yes" | "on" | "1" => Ok(true),
            "no" | "off" | "0" => Ok(false),
            // Delegate other booleans to the standard Rust parser
            _ => self.parse::<bool>(),
        }
    }
}
