//! Cross-references from annotation resources.
//!
//! A resource such as `urn:miriam:obo.go:GO%3A0005737` is split into its database
//! (`go`) and identifier (`GO:0005737`) and materialized as an [`Xref`]. Every resource of
//! an annotation term gets its own cross-reference, keyed by
//! [`AnnotationTerm::resource_key`], so resolving the same annotation again returns the
//! cross-reference created the first time.

use lazy_static::lazy_static;
use log::{debug, warn};
use percent_encoding::percent_decode_str;
use regex::Regex;

use crate::{
    biopax::model::{Xref, XrefKind},
    convert::error::ConvertError,
    registry::IdentityRegistry,
    sbml::model::AnnotationTerm,
};

/// Database used when a resource cannot be split.
pub const UNKNOWN_DATABASE: &str = "unknown";

const IDENTIFIERS_ORG_PREFIXES: [&str; 2] = ["http://identifiers.org/", "https://identifiers.org/"];

lazy_static! {
    /// Characters allowed in a URI-encoded identifier.
    static ref ENCODED_IDENTIFIER: Regex =
        Regex::new(r"^(?:[A-Za-z0-9\-._~:/?#\[\]@!$&'()*+,;=]|%[0-9A-Fa-f]{2})+$").unwrap();

    /// Provider namespaces stripped from database names.
    static ref PROVIDER_PREFIXES: Vec<&'static str> = vec!["obo "];

    /// Abbreviated database name suffixes and their expansion.
    static ref DATABASE_SUFFIXES: Vec<(&'static str, &'static str)> = vec![(" db", " database")];

    /// Databases whose entries are publications.
    static ref PUBLICATION_DATABASES: Vec<&'static str> = vec!["pubmed", "doi"];
}

/// Database and identifier of an annotation resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedResource {
    pub db: String,
    pub id: String,
}

impl ParsedResource {
    pub fn is_publication(&self) -> bool {
        PUBLICATION_DATABASES.iter().any(|db| *db == self.db)
    }
}

/// Splits an annotation resource into a normalized database name and a decoded identifier.
///
/// Accepts `scheme:provider:database:identifier` URNs and identifiers.org URLs. Malformed
/// resources are logged and fall back to the `unknown` database with the raw resource as
/// identifier.
pub fn parse_resource(resource: &str) -> ParsedResource {
    if let Some(path) = IDENTIFIERS_ORG_PREFIXES
        .iter()
        .find_map(|prefix| resource.strip_prefix(prefix))
    {
        if let Some((db, id)) = path.split_once('/') {
            if !db.is_empty() && !id.is_empty() {
                return ParsedResource {
                    db: normalize_database(db),
                    id: decode_identifier(id),
                };
            }
        }
    }

    let tokens: Vec<&str> = resource.split(':').collect();
    if tokens.len() < 4 {
        warn!("Malformed annotation resource '{resource}': expected at least 4 ':'-separated tokens");
        return ParsedResource {
            db: UNKNOWN_DATABASE.to_string(),
            id: resource.to_string(),
        };
    }

    ParsedResource {
        db: normalize_database(tokens[2]),
        id: decode_identifier(&tokens[3..].join(":")),
    }
}

/// Normalizes a database token, e.g. `obo.go` to `go` and `biomodels.db` to
/// `biomodels database`.
pub fn normalize_database(token: &str) -> String {
    let mut db = token.to_lowercase().replace(['.', '-'], " ");

    for prefix in PROVIDER_PREFIXES.iter() {
        if let Some(stripped) = db.strip_prefix(prefix) {
            db = stripped.to_string();
        }
    }

    for (suffix, expansion) in DATABASE_SUFFIXES.iter() {
        if let Some(stripped) = db.strip_suffix(suffix) {
            db = format!("{stripped}{expansion}");
        }
    }

    db
}

/// Percent-decodes an identifier. Invalid identifiers are logged and returned as-is.
pub fn decode_identifier(raw: &str) -> String {
    if !ENCODED_IDENTIFIER.is_match(raw) {
        warn!("Identifier '{raw}' is not a valid URI-encoded value, keeping it as-is");
        return raw.to_string();
    }

    match percent_decode_str(raw).decode_utf8() {
        Ok(decoded) => decoded.into_owned(),
        Err(e) => {
            warn!("Failed to decode identifier '{raw}': {e}, keeping it as-is");
            raw.to_string()
        }
    }
}

/// Registers the cross-references of `terms` and returns their identifiers.
///
/// `kind` is the requested kind. Resources pointing to a publication database always
/// become publication cross-references.
pub fn resolve_xrefs(
    registry: &mut IdentityRegistry,
    terms: &[AnnotationTerm],
    kind: XrefKind,
) -> Result<Vec<String>, ConvertError> {
    let mut uris: Vec<String> = Vec::new();

    for term in terms {
        for resource in &term.resources {
            let uri = registry.complete_id(&format!(
                "{}_{}",
                kind.id_prefix(),
                term.resource_key(resource)
            ));

            registry.get_or_create(&uri, || {
                let parsed = parse_resource(resource);
                let effective = if parsed.is_publication() {
                    XrefKind::Publication
                } else {
                    kind
                };
                Xref::new(effective, parsed.db, parsed.id)
            })?;

            if !uris.contains(&uri) {
                uris.push(uri);
            }
        }
    }

    Ok(uris)
}

/// Resolves the cross-references of `terms` and attaches them to `owner`.
pub fn attach_xrefs(
    registry: &mut IdentityRegistry,
    owner: &str,
    terms: &[AnnotationTerm],
    kind: XrefKind,
) -> Result<Vec<String>, ConvertError> {
    let uris = resolve_xrefs(registry, terms, kind)?;
    for uri in &uris {
        registry.add_xref(owner, uri)?;
    }

    Ok(uris)
}

/// Removes the given cross-references if no element carries them.
pub fn prune_orphans(registry: &mut IdentityRegistry, xrefs: &[String]) {
    for xref in xrefs {
        if registry.xref_owners(xref).next().is_none() && registry.remove(xref).is_some() {
            debug!("Removed unreferenced cross-reference '{xref}'");
        }
    }
}
