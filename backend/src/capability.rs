use std::collections::BTreeSet;
use std::fmt;

use super::gfx::GraphicsApi;

/// Desktop GL versions a resolved context is checked against, oldest first.
pub const KNOWN_VERSIONS: [(u32, u32); 19] = [
    (1, 0),
    (1, 1),
    (1, 2),
    (1, 3),
    (1, 4),
    (1, 5),
    (2, 0),
    (2, 1),
    (3, 0),
    (3, 1),
    (3, 2),
    (3, 3),
    (4, 0),
    (4, 1),
    (4, 2),
    (4, 3),
    (4, 4),
    (4, 5),
    (4, 6),
];

const ES_PREFIXES: [&str; 3] = ["OpenGL ES-CM ", "OpenGL ES-CL ", "OpenGL ES "];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GlVersion {
    pub major: u32,
    pub minor: u32,
}

impl GlVersion {
    pub const fn new(major: u32, minor: u32) -> GlVersion {
        GlVersion { major, minor }
    }

    /// Decodes the loader's `major * 10 + minor` form.
    pub const fn from_encoded(version: u32) -> GlVersion {
        GlVersion {
            major: version / 10,
            minor: version % 10,
        }
    }

    pub const fn encoded(&self) -> u32 {
        self.major * 10 + self.minor
    }

    /// True when this version is at least `major.minor`.
    pub const fn supports(&self, major: u32, minor: u32) -> bool {
        self.major > major || (self.major == major && self.minor >= minor)
    }

    /// Parses the driver's `GL_VERSION` string, e.g. `"4.6.0 NVIDIA 535.104"`
    /// or `"OpenGL ES 3.2 Mesa 23.1"`. Returns `None` when no `major.minor`
    /// pair can be read.
    pub fn parse(version: &str) -> Option<GlVersion> {
        let mut s = version.trim_start();
        for prefix in ES_PREFIXES {
            if let Some(rest) = s.strip_prefix(prefix) {
                s = rest;
                break;
            }
        }

        let (major, rest) = split_number(s)?;
        let rest = rest.strip_prefix('.')?;
        let (minor, _) = split_number(rest)?;
        Some(GlVersion { major, minor })
    }

    pub fn feature_name(major: u32, minor: u32) -> String {
        format!("GL_VERSION_{major}_{minor}")
    }
}

impl fmt::Display for GlVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

fn split_number(s: &str) -> Option<(u32, &str)> {
    let end = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
    if end == 0 {
        return None;
    }
    let n = s[..end].parse().ok()?;
    Some((n, &s[end..]))
}

/// Named feature flags a resolver can be asked about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feature {
    /// The context satisfies the minimum version needed to render (GL 2.0).
    MeetsMinimumVersion,
}

impl Feature {
    pub fn name(&self) -> &'static str {
        match self {
            Feature::MeetsMinimumVersion => "GL_VERSION_2_0",
        }
    }
}

/// Which driver-reported string to fetch for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverString {
    Vendor,
    Renderer,
    Version,
    ShadingLanguageVersion,
}

/// Version and feature flags of a context, filled in once after the entry
/// points have been resolved.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Capabilities {
    pub version: Option<GlVersion>,
    pub features: BTreeSet<String>,
}

impl Capabilities {
    pub fn new(version: GlVersion, extensions: impl IntoIterator<Item = String>) -> Capabilities {
        let mut features: BTreeSet<String> = KNOWN_VERSIONS
            .iter()
            .filter(|(major, minor)| version.supports(*major, *minor))
            .map(|(major, minor)| GlVersion::feature_name(*major, *minor))
            .collect();
        features.extend(extensions.into_iter().filter(|e| !e.is_empty()));
        Capabilities {
            version: Some(version),
            features,
        }
    }

    /// `0` when nothing has been resolved.
    pub fn encoded_version(&self) -> u32 {
        self.version.map_or(0, |v| v.encoded())
    }

    pub fn has(&self, name: &str) -> bool {
        self.features.contains(name)
    }
}

/// Resolves driver entry points for an active context and reports what the
/// context supports.
pub trait CapabilityResolver {
    /// Proof that a context is current, handed out by the surface manager.
    type Context;
    /// Handle draw calls go through once the entry points are bound.
    type Api: GraphicsApi;

    /// Binds every entry point and returns the encoded version
    /// (`major * 10 + minor`), or `0` if nothing usable was found.
    fn resolve_capabilities(&mut self, context: &Self::Context) -> u32;

    fn query_feature(&self, name: &str) -> bool;

    fn driver_string(&self, kind: DriverString) -> String;

    /// Only valid after a successful `resolve_capabilities`.
    fn bind(&self) -> Self::Api;
}
