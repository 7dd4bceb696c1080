//! Display names for protocol type, message signature, action and return
//! codes.
//!
//! Each kind of code has a static descriptor table. Lookups are by exact
//! code match; a code missing from the table is not an error, it gets the
//! table's default name.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One entry of a descriptor table.
#[derive(Debug, Eq, PartialEq, Clone, Copy, Serialize)]
pub struct Descriptor {
    pub code: u32,
    pub name: &'static str,
}

/// Name of `code` in `table`, or `default` if the table has no such code.
pub fn lookup(table: &[Descriptor], code: u32, default: &'static str) -> &'static str {
    table
        .iter()
        .find(|d| d.code == code)
        .map_or(default, |d| d.name)
}

// Defines a code enum together with its descriptor table, so the two cannot
// drift apart.
macro_rules! code_table {
    (
        $(#[$meta:meta])*
        pub enum $name:ident: $repr:ident;
        table $table:ident, default $default:literal;
        {
            $($(#[$vmeta:meta])* $variant:ident = $code:literal => $label:literal,)+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Eq, Hash, PartialEq, Clone, Copy, Serialize, Deserialize)]
        #[repr($repr)]
        pub enum $name {
            $($(#[$vmeta])* $variant = $code,)+
        }

        #[doc = concat!("Descriptor table for [`", stringify!($name), "`].")]
        pub static $table: &[Descriptor] = &[
            $(Descriptor { code: $code, name: $label },)+
        ];

        impl $name {
            /// Name used for codes missing from the table.
            pub const DEFAULT_NAME: &'static str = $default;

            pub const fn code(self) -> $repr {
                self as $repr
            }

            pub fn name(self) -> &'static str {
                lookup($table, self as u32, $default)
            }

            pub fn from_code(code: $repr) -> Option<Self> {
                match code {
                    $($code => Some(Self::$variant),)+
                    _ => None,
                }
            }

            pub fn iter() -> impl Iterator<Item = Self> {
                [$(Self::$variant,)+].into_iter()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.name())
            }
        }
    };
}

code_table! {
    /// Transport protocol a channel speaks.
    pub enum ProtocolType: u8;
    table PROTOCOL_TYPES, default "Unknown";
    {
        Control = 0 => "Control",
        Data = 1 => "Data",
        Heartbeat = 2 => "Heartbeat",
        Replication = 3 => "Replication",
        Management = 4 => "Management",
    }
}

code_table! {
    /// Signature at the start of every message.
    pub enum MessageSignature: u16;
    table MESSAGE_SIGNATURES, default "Unknown";
    {
        Hello = 0x4c48 => "Hello",
        HelloAck = 0x4148 => "HelloAck",
        Request = 0x5152 => "Request",
        Response = 0x5352 => "Response",
        Event = 0x5645 => "Event",
        Ping = 0x4950 => "Ping",
        Pong = 0x4f50 => "Pong",
        Bye = 0x5942 => "Bye",
    }
}

code_table! {
    /// What a connection handler decided to do next.
    pub enum Action: u32;
    table ACTIONS, default "Unknown";
    {
        None = 0 => "None",
        Connect = 1 => "Connect",
        Disconnect = 2 => "Disconnect",
        Send = 3 => "Send",
        Receive = 4 => "Receive",
        Retry = 5 => "Retry",
        Abort = 6 => "Abort",
    }
}

code_table! {
    /// Result of a toolkit operation.
    pub enum ReturnCode: u32;
    table RETURN_CODES, default "Unknow";
    {
        Ok = 0 => "OK",
        Error = 1 => "Error",
    }
}

pub fn protocol_type_name(code: u8) -> &'static str {
    lookup(PROTOCOL_TYPES, code.into(), ProtocolType::DEFAULT_NAME)
}

pub fn message_signature_name(code: u16) -> &'static str {
    lookup(MESSAGE_SIGNATURES, code.into(), MessageSignature::DEFAULT_NAME)
}

pub fn action_name(code: u32) -> &'static str {
    lookup(ACTIONS, code, Action::DEFAULT_NAME)
}

pub fn return_code_name(code: u32) -> &'static str {
    lookup(RETURN_CODES, code, ReturnCode::DEFAULT_NAME)
}
