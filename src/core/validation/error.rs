use thiserror::Error;

/// The first client-side check that failed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please select an audio file to upload")]
    MissingFile,

    #[error("Please upload an audio file (got {mime_type})")]
    UnsupportedType { mime_type: String },

    #[error(
        "Audio file must be {} or smaller (got {size} bytes)",
        format_byte_limit(.max)
    )]
    FileTooLarge { size: u64, max: u64 },

    #[error("Please enter a name for the voice")]
    EmptyName,

    #[error("Voice name must be at most {max} characters (got {length})")]
    NameTooLong { length: usize, max: usize },

    #[error("Please confirm you have consent to clone this voice")]
    ConsentRequired,

    #[error("Please enter some text to convert to speech")]
    EmptyText,

    #[error("Text must be at most {max} characters (got {length})")]
    TextTooLong { length: usize, max: usize },
}

fn format_byte_limit(bytes: &u64) -> String {
    const KIB: u64 = 1024;
    const MIB: u64 = 1024 * 1024;

    match *bytes {
        b if b >= MIB && b % MIB == 0 => format!("{} MB", b / MIB),
        b if b >= MIB => format!("{:.1} MB", b as f64 / MIB as f64),
        b if b >= KIB && b % KIB == 0 => format!("{} KB", b / KIB),
        b if b >= KIB => format!("{:.1} KB", b as f64 / KIB as f64),
        b => format!("{b} bytes"),
    }
}
