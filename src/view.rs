//! Template rendering.
//!
//! # Responsibilities
//! - Hold named templates (built-in, optionally overridden from disk)
//! - Render them with request data through a Jinja-style engine
//!
//! # Design Decisions
//! - Built-in templates are compiled into the binary
//! - Escaping follows the template name: `.html` is HTML-escaped, anything
//!   else (the log template) is rendered as-is
//! - Missing keys render as empty strings

use std::fs;
use std::path::{Path, PathBuf};

use minijinja::{Environment, ErrorKind};
use serde::Serialize;
use thiserror::Error;

pub use minijinja::context;

const BUILTIN: &[(&str, &str)] = &[
    ("Home/index.html", include_str!("../views/Home/index.html")),
    ("Error/400.html", include_str!("../views/Error/400.html")),
    ("Error/404.html", include_str!("../views/Error/404.html")),
    ("Error/500.html", include_str!("../views/Error/500.html")),
    ("Error/error.html", include_str!("../views/Error/error.html")),
    (
        "Error/error.log.template",
        include_str!("../views/Error/error.log.template"),
    ),
];

/// Template errors.
#[derive(Debug, Error)]
pub enum ViewError {
    #[error("template '{0}' not found")]
    NotFound(String),

    #[error("failed to read template {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Template(#[from] minijinja::Error),
}

/// A set of named templates.
#[derive(Debug, Clone)]
pub struct Views {
    env: Environment<'static>,
}

impl Default for Views {
    fn default() -> Self {
        Self::new()
    }
}

impl Views {
    /// An empty set.
    pub fn new() -> Self {
        Self {
            env: Environment::new(),
        }
    }

    /// The templates shipped with the application.
    pub fn builtin() -> Self {
        let mut views = Self::new();
        for (name, source) in BUILTIN {
            if let Err(e) = views.env.add_template(*name, *source) {
                tracing::error!(template = %name, error = %e, "Built-in template rejected");
            }
        }
        views
    }

    /// Add every file under `dir`, named by its `/`-separated relative path.
    /// Files replace templates with the same name.
    pub fn load_dir(&mut self, dir: &Path) -> Result<usize, ViewError> {
        let mut loaded = 0;
        let mut pending = vec![dir.to_path_buf()];

        while let Some(current) = pending.pop() {
            let entries = fs::read_dir(&current).map_err(|source| ViewError::Io {
                path: current.clone(),
                source,
            })?;

            for entry in entries {
                let path = entry
                    .map_err(|source| ViewError::Io {
                        path: current.clone(),
                        source,
                    })?
                    .path();

                if path.is_dir() {
                    pending.push(path);
                    continue;
                }

                let Ok(relative) = path.strip_prefix(dir) else {
                    continue;
                };
                let name = relative
                    .components()
                    .map(|c| c.as_os_str().to_string_lossy())
                    .collect::<Vec<_>>()
                    .join("/");
                let source = fs::read_to_string(&path).map_err(|source| ViewError::Io {
                    path: path.clone(),
                    source,
                })?;

                tracing::debug!(template = %name, "Template loaded");
                self.insert(name, source)?;
                loaded += 1;
            }
        }

        Ok(loaded)
    }

    /// Add or replace a template. Syntax errors are reported here.
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        source: impl Into<String>,
    ) -> Result<(), ViewError> {
        self.env
            .add_template_owned(name.into(), source.into())
            .map_err(ViewError::from)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.env.get_template(name).is_ok()
    }

    /// Render `name` with `ctx`, usually built with [`context!`].
    pub fn render<S: Serialize>(&self, name: &str, ctx: S) -> Result<String, ViewError> {
        let template = self.env.get_template(name).map_err(|e| match e.kind() {
            ErrorKind::TemplateNotFound => ViewError::NotFound(name.to_string()),
            _ => ViewError::Template(e),
        })?;
        Ok(template.render(ctx)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_templates_present() {
        let views = Views::builtin();
        for (name, _) in BUILTIN {
            assert!(views.contains(name));
        }
        assert!(views
            .render("Home/index.html", context! {})
            .unwrap()
            .contains("<h1>"));
    }

    #[test]
    fn test_placeholders() {
        let mut views = Views::new();
        views
            .insert("t.txt", "Hello {{name}}, {{ greeting }}!{{missing}}")
            .unwrap();

        let out = views
            .render("t.txt", context! { name => "Ada", greeting => "welcome" })
            .unwrap();
        assert_eq!(out, "Hello Ada, welcome!");
    }

    #[test]
    fn test_filters_and_blocks_are_evaluated() {
        let mut views = Views::new();
        views
            .insert(
                "t.txt",
                "{{ msg|upper }}{% if debug %} (debug){% endif %}",
            )
            .unwrap();

        let out = views
            .render("t.txt", context! { msg => "oops", debug => true })
            .unwrap();
        assert_eq!(out, "OOPS (debug)");
    }

    #[test]
    fn test_html_templates_escape_values() {
        let mut views = Views::new();
        views.insert("t.html", "<p>{{ msg }}</p>").unwrap();
        views.insert("t.log.template", "<p>{{ msg }}</p>").unwrap();

        let escaped = views
            .render("t.html", context! { msg => "<b>x & y</b>" })
            .unwrap();
        assert!(escaped.starts_with("<p>&lt;b&gt;x &amp; y&lt;"));
        assert!(!escaped.contains("<b>"));

        let raw = views
            .render("t.log.template", context! { msg => "<b>" })
            .unwrap();
        assert_eq!(raw, "<p><b></p>");
    }

    #[test]
    fn test_unknown_template() {
        let views = Views::new();
        assert!(matches!(
            views.render("nope.html", context! {}),
            Err(ViewError::NotFound(name)) if name == "nope.html"
        ));
    }

    #[test]
    fn test_syntax_error_rejected_on_insert() {
        let mut views = Views::new();
        assert!(matches!(
            views.insert("bad.html", "{% if %}"),
            Err(ViewError::Template(_))
        ));
    }

    #[test]
    fn test_load_dir_overrides_builtin() {
        let dir = std::env::temp_dir().join(format!("front-views-{}", uuid::Uuid::new_v4()));
        fs::create_dir_all(dir.join("Home")).unwrap();
        fs::write(dir.join("Home/index.html"), "custom {{ who }}").unwrap();

        let mut views = Views::builtin();
        assert_eq!(views.load_dir(&dir).unwrap(), 1);
        assert_eq!(
            views.render("Home/index.html", context! { who => "home" }).unwrap(),
            "custom home"
        );

        fs::remove_dir_all(&dir).unwrap_or_default();
    }
}
