//! Log line formatter that stamps each event with the scene frame it happened in.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use time::macros::format_description;
use time::{format_description::FormatItem, OffsetDateTime};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::registry::LookupSpan;

/// Mirror of the current scene's `FrameCount`; systems log without access to the world.
static SCENE_FRAME: AtomicU64 = AtomicU64::new(0);

const TIMESTAMP_FORMAT: &[FormatItem<'static>] = format_description!("[hour]:[minute]:[second].[subsecond digits:3]");

/// `HH:MM:SS.sss f#FRAME LEVEL target: message`
pub struct FrameFormatter;

impl<S, N> FormatEvent<S, N> for FrameFormatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(&self, ctx: &FmtContext<'_, S, N>, mut writer: Writer<'_>, event: &Event<'_>) -> fmt::Result {
        let meta = event.metadata();

        let stamp = OffsetDateTime::now_utc().format(&TIMESTAMP_FORMAT).map_err(|_| fmt::Error)?;
        let prefix = format!("{} {}", stamp, frame_label(SCENE_FRAME.load(Ordering::Relaxed)));
        if writer.has_ansi_escapes() {
            write!(writer, "\x1b[2m{}\x1b[0m ", prefix)?;
        } else {
            write!(writer, "{} ", prefix)?;
        }

        write_level(&mut writer, meta.level())?;
        write!(writer, " {}: ", meta.target())?;

        ctx.format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

/// The frame column of a log line, padded so lines of one run stay aligned.
pub fn frame_label(frame: u64) -> String {
    format!("f#{:05}", frame)
}

fn write_level(writer: &mut Writer<'_>, level: &Level) -> fmt::Result {
    let (color, text) = match *level {
        Level::TRACE => ("\x1b[35m", "TRACE"),
        Level::DEBUG => ("\x1b[34m", "DEBUG"),
        Level::INFO => ("\x1b[32m", " INFO"),
        Level::WARN => ("\x1b[33m", " WARN"),
        Level::ERROR => ("\x1b[31m", "ERROR"),
    };

    if writer.has_ansi_escapes() {
        write!(writer, "{}{}\x1b[0m", color, text)
    } else {
        write!(writer, "{}", text)
    }
}

/// Publishes the frame the scene just finished, so following log lines carry it.
pub fn publish_frame(frame: u64) {
    SCENE_FRAME.store(frame, Ordering::Relaxed);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_label_is_padded() {
        assert_eq!(frame_label(31), "f#00031");
        assert_eq!(frame_label(123_456), "f#123456");
    }
}
