use clap::ValueEnum;

/// How command results are printed on stdout
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Readable text
    #[default]
    Human,
    /// Pretty-printed JSON
    Json,
}
