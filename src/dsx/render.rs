use std::fs;
use std::path::Path;
use std::sync::OnceLock;

use log::{info, warn};
use regex::Regex;

use crate::dsx::context::DeploymentContext;
use crate::error::RenderError;

/// `$$`, `$NAME`, `${NAME}`, and a catch-all for any other `$`
fn placeholder_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"\$(?:(?P<escaped>\$)|(?P<named>[_A-Za-z][_A-Za-z0-9]*)|\{(?P<braced>[_A-Za-z][_A-Za-z0-9]*)\}|(?P<invalid>))")
            .expect("Valid placeholder pattern")
    })
}

/// Replace every placeholder in a template with its context value
///
/// Single pass: substituted values are copied verbatim and never scanned for placeholders
/// themselves. Unknown names and stray `$` characters are errors rather than being left in place.
pub fn substitute(template: &str, context: &DeploymentContext) -> Result<String, RenderError> {
    let mut rendered = String::with_capacity(template.len());
    let mut last = 0;

    for caps in placeholder_pattern().captures_iter(template) {
        let whole = caps.get_match();
        rendered.push_str(&template[last..whole.start()]);

        if caps.name("escaped").is_some() {
            rendered.push('$');
        } else if let Some(name) = caps.name("named").or_else(|| caps.name("braced")) {
            match context.get(name.as_str()) {
                Some(value) => rendered.push_str(value),
                None => {
                    return Err(RenderError::UnknownPlaceholder {
                        name: name.as_str().to_string(),
                        line: line_number(template, whole.start()),
                    })
                }
            }
        } else {
            return Err(RenderError::InvalidPlaceholder {
                line: line_number(template, whole.start()),
                column: column_number(template, whole.start()),
            });
        }

        last = whole.end();
    }

    rendered.push_str(&template[last..]);
    Ok(rendered)
}

fn line_number(text: &str, offset: usize) -> usize {
    text[..offset].matches('\n').count() + 1
}

fn column_number(text: &str, offset: usize) -> usize {
    let line_start = text[..offset].rfind('\n').map_or(0, |i| i + 1);
    text[line_start..offset].chars().count() + 1
}

/// Render a template file into the build location
///
/// The build directory is created if needed and any existing document at `out` is replaced
/// entirely. Substitution completes before `out` is opened: a template that fails to render
/// leaves whatever was already on disk untouched.
pub fn render_dsx(template: &Path, out: &Path, context: &DeploymentContext) -> Result<(), RenderError> {
    if let Some(parent) = out.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| RenderError::CreateDir { path: parent.to_path_buf(), source })?;
    }

    info!("Reading template {}", template.display());
    let raw = fs::read_to_string(template).map_err(|source| RenderError::Read { path: template.to_path_buf(), source })?;

    let dsx = substitute(&raw, context).map_err(|err| {
        warn!("Template {} can't be rendered: {}", template.display(), err);
        err
    })?;

    info!("Writing rendered job definition to {}", out.display());
    fs::write(out, dsx).map_err(|source| RenderError::Write { path: out.to_path_buf(), source })
}
