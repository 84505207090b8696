//! Package URL (`pkg:type/namespace/name@version?qualifiers#subpath`).
//!
//! Components are held percent-decoded. `canonicalize` re-encodes every
//! namespace segment, name, version, qualifier value and subpath segment,
//! leaving only unreserved characters (`A-Z a-z 0-9 - . _ ~`) as-is, so
//! `@acme` and `%40acme` canonicalise to the same string.

use crate::{ProjectqlError, Result};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageUrl {
    pub ty: String,
    pub namespace: Option<String>,
    pub name: String,
    pub version: Option<String>,
    pub qualifiers: BTreeMap<String, String>,
    pub subpath: Option<String>,
}

fn encode_segments(path: &str) -> String {
    path.split('/')
        .map(|seg| urlencoding::encode(seg).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

impl PackageUrl {
    /// Canonical string form, used when binding a purl as a query parameter.
    pub fn canonicalize(&self) -> String {
        let mut out = format!("pkg:{}/", self.ty);
        if let Some(ns) = &self.namespace {
            out.push_str(&encode_segments(ns));
            out.push('/');
        }
        out.push_str(&urlencoding::encode(&self.name));
        if let Some(v) = &self.version {
            out.push('@');
            out.push_str(&urlencoding::encode(v));
        }
        if !self.qualifiers.is_empty() {
            let qs: Vec<String> = self
                .qualifiers
                .iter()
                .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
                .collect();
            out.push('?');
            out.push_str(&qs.join("&"));
        }
        if let Some(sp) = &self.subpath {
            out.push('#');
            out.push_str(&encode_segments(sp));
        }
        out
    }
}

impl fmt::Display for PackageUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonicalize())
    }
}

fn invalid(s: &str, why: &str) -> ProjectqlError {
    ProjectqlError::InvalidPurl(format!("{why}: '{s}'"))
}

fn decode(s: &str, part: &str) -> Result<String> {
    urlencoding::decode(part)
        .map(|d| d.into_owned())
        .map_err(|_| invalid(s, "invalid percent-encoding"))
}

fn is_valid_type(ty: &str) -> bool {
    !ty.is_empty()
        && !ty.starts_with(|c: char| c.is_ascii_digit())
        && ty
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '+' | '-'))
}

fn clean_segments(path: &str, drop_dots: bool) -> Vec<&str> {
    path.split('/')
        .filter(|seg| !seg.is_empty() && !(drop_dots && (*seg == "." || *seg == "..")))
        .collect()
}

fn decode_segments(s: &str, segs: &[&str]) -> Result<Option<String>> {
    if segs.is_empty() {
        return Ok(None);
    }
    let decoded = segs
        .iter()
        .map(|seg| decode(s, seg))
        .collect::<Result<Vec<_>>>()?;
    Ok(Some(decoded.join("/")))
}

/// Types whose namespace is case-insensitive.
const LOWERCASE_NAMESPACE: &[&str] = &[
    "bitbucket",
    "composer",
    "deb",
    "github",
    "gitlab",
    "golang",
    "hex",
    "npm",
    "rpm",
];

/// Types whose name is case-insensitive.
const LOWERCASE_NAME: &[&str] = &[
    "bitbucket",
    "composer",
    "deb",
    "github",
    "gitlab",
    "hex",
    "npm",
    "pypi",
];

impl FromStr for PackageUrl {
    type Err = ProjectqlError;

    fn from_str(s: &str) -> Result<Self> {
        let rest = match s.split_once(':') {
            Some((scheme, rest)) if scheme.eq_ignore_ascii_case("pkg") => rest,
            _ => return Err(invalid(s, "missing 'pkg:' scheme")),
        };

        let (rest, subpath) = match rest.split_once('#') {
            Some((head, sp)) => (head, decode_segments(s, &clean_segments(sp, true))?),
            None => (rest, None),
        };

        let (rest, qualifiers) = match rest.split_once('?') {
            Some((head, qs)) => {
                let mut qualifiers = BTreeMap::new();
                for pair in qs.split('&').filter(|p| !p.is_empty()) {
                    let (k, v) = pair
                        .split_once('=')
                        .ok_or_else(|| invalid(s, "qualifier without '='"))?;
                    if k.is_empty() {
                        return Err(invalid(s, "empty qualifier key"));
                    }
                    let v = decode(s, v)?;
                    if !v.is_empty() {
                        qualifiers.insert(k.to_ascii_lowercase(), v);
                    }
                }
                (head, qualifiers)
            }
            None => (rest, BTreeMap::new()),
        };

        let (rest, version) = match rest.rsplit_once('@') {
            Some((head, v)) if !v.contains('/') => {
                let v = decode(s, v)?;
                (head, (!v.is_empty()).then_some(v))
            }
            _ => (rest, None),
        };

        let mut segs = clean_segments(rest, false);
        if segs.is_empty() {
            return Err(invalid(s, "missing type"));
        }
        let ty = segs.remove(0).to_ascii_lowercase();
        if !is_valid_type(&ty) {
            return Err(invalid(s, "invalid type"));
        }
        let name = segs.pop().ok_or_else(|| invalid(s, "missing name"))?;
        let mut name = decode(s, name)?;
        let mut namespace = decode_segments(s, &segs)?;

        if LOWERCASE_NAMESPACE.contains(&ty.as_str()) {
            namespace = namespace.map(|ns| ns.to_lowercase());
        }
        if LOWERCASE_NAME.contains(&ty.as_str()) {
            name = name.to_lowercase();
        }
        if ty == "pypi" {
            name = name.replace('_', "-");
        }

        Ok(Self {
            ty,
            namespace,
            name,
            version,
            qualifiers,
            subpath,
        })
    }
}
