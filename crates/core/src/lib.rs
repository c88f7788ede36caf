#![forbid(unsafe_code)]

pub mod ids {
    /// Deployed program address written into an IDL metadata block.
    ///
    /// Addresses are opaque: the only requirement is that they are non-empty.
    #[derive(Clone, Debug, PartialEq, Eq, Hash)]
    pub struct ProgramAddress(String);

    impl ProgramAddress {
        pub fn as_str(&self) -> &str {
            &self.0
        }

        pub fn try_new(value: impl Into<String>) -> Result<Self, AddressError> {
            let value = value.into();
            validate_address(&value)?;
            Ok(Self(value))
        }

        pub(crate) fn from_static(value: &'static str) -> Self {
            Self(value.to_string())
        }
    }

    impl std::fmt::Display for ProgramAddress {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.write_str(&self.0)
        }
    }

    #[derive(Clone, Debug, PartialEq, Eq)]
    pub enum AddressError {
        Empty,
    }

    impl std::fmt::Display for AddressError {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            match self {
                Self::Empty => write!(f, "program address must not be empty"),
            }
        }
    }

    impl std::error::Error for AddressError {}

    fn validate_address(value: &str) -> Result<(), AddressError> {
        if value.is_empty() {
            return Err(AddressError::Empty);
        }
        Ok(())
    }
}

pub mod idl {
    /// Top-level IDL key that receives the metadata block.
    pub const METADATA_KEY: &str = "metadata";
    /// The single key inside the metadata block.
    pub const ADDRESS_KEY: &str = "address";
    pub const IDL_EXTENSION: &str = "json";

    /// Default IDL output directory, relative to the Anchor workspace root.
    pub const DEFAULT_IDL_DIR: &str = "target/idl";
    /// Marker file of an Anchor workspace root.
    pub const WORKSPACE_MARKER: &str = "Anchor.toml";

    pub fn idl_file_name(idl_name: &str) -> String {
        format!("{idl_name}.{IDL_EXTENSION}")
    }
}

pub mod targets {
    use crate::ids::ProgramAddress;
    use std::path::{Path, PathBuf};

    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct KnownProgram {
        pub idl_name: &'static str,
        pub address: &'static str,
    }

    impl KnownProgram {
        pub fn program_address(&self) -> ProgramAddress {
            ProgramAddress::from_static(self.address)
        }
    }

    /// Programs whose IDLs are patched by default, in processing order.
    pub const KNOWN_PROGRAMS: &[KnownProgram] = &[
        KnownProgram {
            idl_name: "udf_solana",
            address: "7HramSnctpbXqZ4SEzqvqteZdMdj3tEB2c9NT7egPQi7",
        },
        KnownProgram {
            idl_name: "photon_mock",
            address: "pccm961CjaR7T7Hcht9omrXQb9w54ntJo95FFT7N9AJ",
        },
        KnownProgram {
            idl_name: "price_consumer",
            address: "3r5ixGQu8DRmJWgFEjwnDUQ6yasfYFXDsUbqkA6gkRtv",
        },
    ];

    pub fn known_program(idl_name: &str) -> Option<&'static KnownProgram> {
        let idl_name = idl_name.trim();
        KNOWN_PROGRAMS
            .iter()
            .find(|program| program.idl_name == idl_name)
    }

    /// One IDL file and the address it should carry.
    #[derive(Clone, Debug, PartialEq, Eq)]
    pub struct TargetEntry {
        pub path: PathBuf,
        pub address: ProgramAddress,
    }

    impl TargetEntry {
        pub fn new(path: impl Into<PathBuf>, address: ProgramAddress) -> Self {
            Self {
                path: path.into(),
                address,
            }
        }

        pub fn for_idl(idl_dir: &Path, idl_name: &str, address: ProgramAddress) -> Self {
            Self::new(
                idl_dir.join(crate::idl::idl_file_name(idl_name.trim())),
                address,
            )
        }
    }

    pub fn default_targets(idl_dir: &Path) -> Vec<TargetEntry> {
        KNOWN_PROGRAMS
            .iter()
            .map(|program| {
                TargetEntry::for_idl(
                    idl_dir,
                    program.idl_name,
                    program.program_address(),
                )
            })
            .collect()
    }
}
