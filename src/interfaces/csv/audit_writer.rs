use crate::domain::audit::AuditEntry;
use crate::error::Result;
use serde::Serialize;
use std::io::Write;

#[derive(Serialize)]
struct AuditRow<'a> {
    entity_type: &'a str,
    entity_id: &'a str,
    action: &'a str,
    user_id: &'a str,
    old_data: String,
    new_data: String,
    timestamp: String,
}

impl<'a> AuditRow<'a> {
    fn from_entry(entry: &'a AuditEntry) -> Result<Self> {
        Ok(Self {
            entity_type: entry.entity_type().as_str(),
            entity_id: entry.entity_id(),
            action: entry.action().as_str(),
            user_id: entry.user_id(),
            old_data: serde_json::to_string(entry.old_data())?,
            new_data: serde_json::to_string(entry.new_data())?,
            timestamp: entry.timestamp().to_rfc3339(),
        })
    }
}

/// Writes audit entries as CSV, one row per entry, payloads as JSON text.
pub struct AuditWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> AuditWriter<W> {
    pub fn new(sink: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(sink),
        }
    }

    pub fn write_entries<'a>(
        &mut self,
        entries: impl IntoIterator<Item = &'a AuditEntry>,
    ) -> Result<()> {
        for entry in entries {
            self.writer.serialize(AuditRow::from_entry(entry)?)?;
        }
        self.writer.flush()?;
        Ok(())
    }
}
