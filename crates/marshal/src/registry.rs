use crate::{Feature, MarshalError, Value, exports::EXPORT_TABLES};
use posix::{caps, config, error_report};
use rustc_hash::FxHashMap;
use std::sync::OnceLock;

/// Type of an exported wrapper.
pub type ExportHandler = fn(&mut [Value]) -> Result<Value, MarshalError>;

/// A wrapper callable by the host under a fixed name.
#[derive(Debug, Clone, Copy)]
pub struct Export {
    pub name: &'static str,
    pub arity: usize,
    /// The optional feature this wrapper needs, checked on every call.
    pub requires: Option<Feature>,
    pub call: ExportHandler,
}
impl Export {
    /// Returns `true` if the feature this wrapper needs, if any, is available.
    pub fn available(&self) -> bool {
        self.requires.is_none_or(caps::available)
    }
}

fn index() -> &'static FxHashMap<&'static str, &'static Export> {
    static INDEX: OnceLock<FxHashMap<&'static str, &'static Export>> = OnceLock::new();
    INDEX.get_or_init(|| registered().map(|x| (x.name, x)).collect())
}

/// Iterates over every export, family by family.
pub fn registered() -> impl Iterator<Item = &'static Export> {
    EXPORT_TABLES.iter().flat_map(|x| x.iter())
}

pub fn lookup(name: &str) -> Option<&'static Export> {
    index().get(name).copied()
}

/// Calls the export named `name` with `args`.
///
/// Buffers passed in `args` may be updated in place.
pub fn invoke(name: &str, args: &mut [Value]) -> Result<Value, MarshalError> {
    let export = lookup(name).ok_or_else(|| MarshalError::UnknownExport(name.to_owned()))?;
    log::debug!("{name}: called with {} arguments", args.len());
    let result = (export.call)(args);
    match &result {
        Ok(Value::Integer(n)) if *n < 0 => log::trace!("{name}: returned error code {n}"),
        Ok(_) => {}
        Err(err) => log::debug!("{err}"),
    }
    result
}

/// Fails unless `feature` is available. Under `POSIXGLUE_STRICT=1`, an absent feature aborts the process.
pub fn require(export: &'static str, feature: Feature) -> Result<(), MarshalError> {
    if caps::available(feature) {
        return Ok(());
    }
    log::warn!("{export}: {feature} is unavailable");
    if config::strict_unsupported() {
        error_report::fatal(format_args!("{export}: {feature} is not supported"));
    }
    Err(MarshalError::Unsupported { export, feature })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rustc_hash::FxHashSet;

    #[test]
    fn export_names_are_unique() {
        let mut seen = FxHashSet::default();
        for export in registered() {
            assert!(seen.insert(export.name), "duplicate export `{}`", export.name);
        }
        assert_eq!(seen.len(), index().len());
    }

    #[test]
    fn unknown_names_and_arity() {
        assert_eq!(
            invoke("frobnicate", &mut []),
            Err(MarshalError::UnknownExport("frobnicate".to_owned()))
        );
        assert_eq!(
            invoke("getpid", &mut [Value::Integer(1)]),
            Err(MarshalError::Arity {
                export: "getpid",
                expected: 0,
                got: 1
            })
        );
        let pid = invoke("getpid", &mut []).unwrap();
        assert_eq!(pid, Value::Integer(std::process::id() as i128));
    }

    #[test]
    fn bad_argument_reports_position() {
        let err = invoke("close", &mut [Value::Bytevector(vec![])]).unwrap_err();
        assert!(matches!(
            err,
            MarshalError::BadArgument {
                export: "close",
                index: 0,
                ..
            }
        ));
    }
}
