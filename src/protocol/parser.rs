use super::tokenizer::{split_exact, split_fields, FIELD_DELIMITER};
use super::{
    Command, ParsedLine, Rejection, PROVISION_FIELDS, PROVISION_PREFIX, SELECT_TANK_PREFIX,
    SET_NAME_PREFIX, SET_TANKS_PREFIX, SET_TANK_IDS_PREFIX,
};
use crate::device::Credentials;

pub struct CommandParser;

impl CommandParser {
    /// Parse a single line. Matching is by literal prefix on the trimmed line.
    pub fn parse_line(input: &str) -> ParsedLine {
        let line = input.trim();

        if let Some(payload) = line.strip_prefix(PROVISION_PREFIX) {
            Self::parse_provision(payload)
        } else if let Some(payload) = line.strip_prefix(SET_TANK_IDS_PREFIX) {
            ParsedLine::Command(Command::SetTankIds(Self::owned_fields(payload)))
        } else if let Some(payload) = line.strip_prefix(SET_TANKS_PREFIX) {
            ParsedLine::Command(Command::SetTankNames(Self::owned_fields(payload)))
        } else if let Some(name) = line.strip_prefix(SET_NAME_PREFIX) {
            ParsedLine::Command(Command::SetName(name.to_string()))
        } else if let Some(id) = line.strip_prefix(SELECT_TANK_PREFIX) {
            ParsedLine::Command(Command::SelectTank(id.to_string()))
        } else {
            ParsedLine::Unrecognized
        }
    }

    fn parse_provision(payload: &str) -> ParsedLine {
        let fields = match split_exact::<PROVISION_FIELDS>(payload, FIELD_DELIMITER) {
            Ok(fields) => fields,
            Err(found) => {
                return ParsedLine::Rejected(Rejection::FieldCount {
                    expected: PROVISION_FIELDS,
                    found,
                })
            }
        };

        if fields.iter().any(|field| field.is_empty()) {
            return ParsedLine::Rejected(Rejection::EmptyField);
        }

        let [ssid, password, device_uid, backend_url, backend_key] = fields;
        ParsedLine::Command(Command::Provision(Credentials {
            ssid: ssid.to_string(),
            password: password.to_string(),
            device_uid: device_uid.to_string(),
            backend_url: backend_url.to_string(),
            backend_key: backend_key.to_string(),
        }))
    }

    fn owned_fields(payload: &str) -> Vec<String> {
        split_fields(payload, FIELD_DELIMITER)
            .into_iter()
            .map(str::to_string)
            .collect()
    }
}
