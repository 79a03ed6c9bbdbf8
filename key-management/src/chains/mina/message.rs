// key-management/src/chains/mina/message.rs
//
// String message (legacy) + field array (Kimchi) hash inputs

use super::signature::domain_string;
use crate::error::{WalletError, WalletResult};
use mina_hasher::{Hashable, ROInput};
use mina_signer::{BaseField, NetworkId};
use std::str::FromStr;

/// UTF-8 message, hashed bit by bit through the legacy sponge.
#[derive(Clone)]
pub(crate) struct LegacyMessage(pub(crate) String);

impl Hashable for LegacyMessage {
    type D = NetworkId;

    fn to_roinput(&self) -> ROInput {
        ROInput::new().append_bytes(self.0.as_bytes())
    }

    fn domain_string(network_id: NetworkId) -> Option<String> {
        domain_string(network_id)
    }
}

/// Base field elements, absorbed as-is by the Kimchi sponge.
#[derive(Clone)]
pub(crate) struct FieldInput(pub(crate) Vec<BaseField>);

impl Hashable for FieldInput {
    type D = NetworkId;

    fn to_roinput(&self) -> ROInput {
        self.0
            .iter()
            .fold(ROInput::new(), |roi, field| roi.append_field(*field))
    }

    fn domain_string(network_id: NetworkId) -> Option<String> {
        domain_string(network_id)
    }
}

/// Parse decimal strings into base field elements.
pub fn parse_fields<S: AsRef<str>>(fields: &[S]) -> WalletResult<Vec<BaseField>> {
    fields
        .iter()
        .map(|f| {
            let f = f.as_ref();
            BaseField::from_str(f).map_err(|_| {
                WalletError::Validation(format!("'{}' is not a Mina base field element", f))
            })
        })
        .collect()
}
