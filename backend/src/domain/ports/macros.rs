//! `define_port_error!`: error enums for driven ports.
//!
//! Every variant carries one `message: String` describing the adapter
//! failure. The macro derives `thiserror::Error`, adds a snake-case
//! constructor per variant taking `impl Into<String>`, and a `message()`
//! accessor so callers can log or rewrap the text without matching.

macro_rules! define_port_error {
    (
        $(#[$outer:meta])*
        pub enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident => $template:literal
            ),+ $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                #[error($template)]
                $variant { message: String },
            )+
        }

        impl $name {
            ::paste::paste! {
                $(
                    #[doc = concat!("Build a [`", stringify!($name), "::", stringify!($variant), "`].")]
                    pub fn [<$variant:snake>](message: impl Into<String>) -> Self {
                        Self::$variant {
                            message: message.into(),
                        }
                    }
                )+
            }

            /// Adapter-supplied detail, whichever variant this is.
            pub fn message(&self) -> &str {
                match self {
                    $(Self::$variant { message })|+ => message,
                }
            }
        }
    };
}

pub(crate) use define_port_error;
