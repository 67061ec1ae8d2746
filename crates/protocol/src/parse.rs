use crate::types::Protocol;

/// Decode a protocol document, reporting why it failed.
pub fn try_parse_protocol(raw: &[u8]) -> Result<Protocol, quick_xml::DeError> {
    quick_xml::de::from_reader(raw)
}

/// Decode a protocol document; undecodable input becomes `Protocol::default()`.
pub fn parse_protocol(raw: &[u8]) -> Protocol {
    match try_parse_protocol(raw) {
        Ok(protocol) => protocol,
        Err(err) => {
            log::debug!("Failed to decode protocol document: {err}");
            Protocol::default()
        }
    }
}
