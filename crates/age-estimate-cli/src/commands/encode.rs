//! Encode command - build synthetic image payloads.

use std::io::{self, Write};

use anyhow::{Context, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use clap::Args;
use serde_json::{json, Value};

/// Arguments for the encode command
#[derive(Args, Clone, Debug)]
pub struct EncodeArgs {
    /// Image width in pixels
    pub width: u32,

    /// Image height in pixels
    pub height: u32,

    /// Uniform pixel intensity (0-255)
    pub intensity: u8,

    /// Print a complete request document instead of the bare payload
    #[arg(long)]
    pub request: bool,

    /// Grant consent in the request
    #[arg(long, requires = "request")]
    pub consent: bool,

    /// Confidence level to request
    #[arg(long, value_name = "LEVEL", requires = "request")]
    pub level: Option<String>,
}

/// Run the encode command.
pub fn run(args: &EncodeArgs) -> Result<()> {
    write_encoded(&mut io::stdout().lock(), args).context("Failed to write encoded payload")
}

fn write_encoded(out: &mut impl Write, args: &EncodeArgs) -> io::Result<()> {
    let image = encode(args.width, args.height, args.intensity);
    if args.request {
        writeln!(out, "{}", request_document(image, args))?;
    } else {
        writeln!(out, "{image}")?;
    }
    out.flush()
}

/// Base64 of the `width,height,intensity` payload.
fn encode(width: u32, height: u32, intensity: u8) -> String {
    STANDARD.encode(format!("{width},{height},{intensity}"))
}

fn request_document(image: String, args: &EncodeArgs) -> Value {
    let mut doc = json!({
        "image": image,
        "consent": args.consent,
    });
    if let Some(ref level) = args.level {
        doc["confidence_level"] = Value::String(level.clone());
    }
    doc
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(request: bool, consent: bool, level: Option<&str>) -> EncodeArgs {
        EncodeArgs {
            width: 128,
            height: 96,
            intensity: 130,
            request,
            consent,
            level: level.map(String::from),
        }
    }

    #[test]
    fn test_encode_payload() {
        let decoded = STANDARD.decode(encode(128, 96, 130)).unwrap_or_default();
        assert_eq!(decoded, b"128,96,130");
    }

    #[test]
    fn test_request_document() {
        let a = args(true, true, Some("high"));
        let doc = request_document(encode(a.width, a.height, a.intensity), &a);
        assert_eq!(doc["consent"], true);
        assert_eq!(doc["confidence_level"], "high");
        assert_eq!(doc["image"], encode(128, 96, 130));
    }

    #[test]
    fn test_request_without_level() {
        let a = args(true, false, None);
        let doc = request_document(encode(1, 1, 1), &a);
        assert_eq!(doc["consent"], false);
        assert!(doc.get("confidence_level").is_none());
    }

    #[test]
    fn test_write_bare_payload() {
        let mut out = Vec::new();
        assert!(write_encoded(&mut out, &args(false, false, None)).is_ok());
        assert_eq!(out, format!("{}\n", encode(128, 96, 130)).into_bytes());
    }

    #[test]
    fn test_write_request_document() {
        let mut out = Vec::new();
        assert!(write_encoded(&mut out, &args(true, true, Some("low"))).is_ok());
        let doc: Value = serde_json::from_slice(&out).unwrap_or_default();
        assert_eq!(doc["confidence_level"], "low");
        assert_eq!(doc["consent"], true);
    }
}
