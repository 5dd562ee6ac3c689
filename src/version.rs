use std::str::FromStr;
use semver::Version;

#[derive(serde::Serialize, Debug, Clone, PartialEq)]
pub struct BuildVersion {
    pub name: String,
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
    pub pre: String,
}

pub fn get_version() -> BuildVersion {
    let name = env!("CARGO_PKG_NAME").to_owned();

    match Version::from_str(env!("CARGO_PKG_VERSION")) {
        Ok(v) => BuildVersion {
            name,
            major: v.major,
            minor: v.minor,
            patch: v.patch,
            pre: v.pre.to_string(),
        },
        Err(why) => BuildVersion {
            name,
            major: 0,
            minor: 0,
            patch: 0,
            pre: why.to_string(),
        },
    }
}
