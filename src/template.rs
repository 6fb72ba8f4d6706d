//! Placeholder substitution in generated module files.
//!
//! Module skeletons carry literal placeholders (`{{module_name}}`,
//! `ModuleClass`, ...) that are replaced in place once the skeleton has been
//! copied. Replacement is a single left-to-right pass with these rules:
//!
//! - At each position the **longest** matching key wins, so `{{name}}` and
//!   `{{name_upper}}` can coexist.
//! - Replaced text is never rescanned: a value containing another key is
//!   written out verbatim.
//! - Empty keys are ignored.
//! - Matching is on raw bytes, so files need not be valid UTF-8.
//!
//! A file whose content does not change is not rewritten.

use log::debug;
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TemplateError {
    #[error("IO error at {}: {source}", path.display())]
    Io { path: PathBuf, source: io::Error },
}

/// Placeholder → replacement text.
pub type Mapping = BTreeMap<String, String>;

/// Apply `mapping` to `input`, returning the new bytes and the number of
/// replacements made.
pub fn substitute_bytes(input: &[u8], mapping: &Mapping) -> (Vec<u8>, usize) {
    let mut keys: Vec<(&[u8], &[u8])> = mapping
        .iter()
        .filter(|(k, _)| !k.is_empty())
        .map(|(k, v)| (k.as_bytes(), v.as_bytes()))
        .collect();
    if keys.is_empty() {
        return (input.to_vec(), 0);
    }
    // Longest first, so the first hit at a position is the longest one.
    keys.sort_by(|a, b| b.0.len().cmp(&a.0.len()));

    let mut out = Vec::with_capacity(input.len());
    let mut count = 0;
    let mut pos = 0;
    while pos < input.len() {
        let rest = &input[pos..];
        match keys.iter().find(|(key, _)| rest.starts_with(key)) {
            Some((key, value)) => {
                out.extend_from_slice(value);
                pos += key.len();
                count += 1;
            }
            None => {
                out.push(input[pos]);
                pos += 1;
            }
        }
    }
    (out, count)
}

/// Replace placeholders in `file` in place. Returns the replacement count.
pub fn substitute(file: &Path, mapping: &Mapping) -> Result<usize, TemplateError> {
    let io_err = |source| TemplateError::Io {
        path: file.to_path_buf(),
        source,
    };
    let original = fs::read(file).map_err(io_err)?;
    let (rewritten, count) = substitute_bytes(&original, mapping);
    if count > 0 && rewritten != original {
        fs::write(file, rewritten).map_err(io_err)?;
    }
    debug!("{}: {} replacements", file.display(), count);
    Ok(count)
}

/// Body of a cached display-hook method for a generated module.
///
/// The method renders `<hook_prefix><module><suffix>.tpl` through the shop's
/// template cache, keyed on `<module><suffix>.tpl`, and only assigns template
/// variables on a cache miss.
pub fn render_hook_body(module_name: &str, hook_prefix: &str, suffix: &str) -> String {
    format!(
        "if ($this->isCached('{module_name}{suffix}.tpl', $this->getCacheId()) === false)
\t\t{{
\t\t\t$this->smarty->assign(array(

\t\t\t));
\t\t}}

\t\t// Clean memory
\t\tunset($params);

\t\treturn $this->display(__FILE__, '{hook_prefix}{module_name}{suffix}.tpl', $this->getCacheId());"
    )
}
