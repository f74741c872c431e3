//! Check command - validate configuration and templates

use std::path::Path;

use academy_core::{Config, TemplateEngine};
use color_eyre::eyre::{Result, bail};

/// Views the page server renders.
const REQUIRED_VIEWS: [&str; 3] = ["index", "English", "contact"];

/// Views with a built-in plain-text fallback.
const OPTIONAL_VIEWS: [&str; 2] = ["404", "error"];

/// Validation result.
#[derive(Debug, Default)]
struct ValidationResult {
    errors: Vec<String>,
    warnings: Vec<String>,
}

impl ValidationResult {
    fn add_error(&mut self, msg: impl Into<String>) {
        self.errors.push(msg.into());
    }

    fn add_warning(&mut self, msg: impl Into<String>) {
        self.warnings.push(msg.into());
    }

    fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// Run the check command.
///
/// Loads configuration and parses every template without writing anything.
pub fn run(root: &Path, config_path: Option<&Path>, strict: bool) -> Result<()> {
    tracing::info!(?root, ?config_path, strict, "Checking configuration and templates");

    let result = validate(root, config_path);

    println!();
    println!("Summary:");
    println!("  Errors:   {}", result.errors.len());
    println!("  Warnings: {}", result.warnings.len());

    if result.has_errors() {
        println!();
        println!("Errors:");
        for err in &result.errors {
            println!("  ✗ {err}");
        }
    }

    if result.has_warnings() {
        println!();
        println!("Warnings:");
        for warn in &result.warnings {
            println!("  ⚠ {warn}");
        }
    }

    if result.has_errors() {
        bail!("Validation failed with {} error(s)", result.errors.len());
    }

    if strict && result.has_warnings() {
        bail!(
            "Validation failed with {} warning(s) (strict mode)",
            result.warnings.len()
        );
    }

    println!();
    println!("✓ All checks passed");

    Ok(())
}

fn validate(root: &Path, config_path: Option<&Path>) -> ValidationResult {
    let mut result = ValidationResult::default();

    println!("Checking configuration...");
    let config = match Config::load(root, config_path) {
        Ok(c) => {
            println!("  ✓ Configuration valid");
            c
        }
        Err(e) => {
            result.add_error(format!("Configuration error: {e}"));
            println!("  ✗ Configuration invalid: {e}");
            return result;
        }
    };

    println!("\nChecking templates...");
    let engine = match TemplateEngine::load(&config.views_dir(), &config.paths) {
        Ok(engine) => engine,
        Err(e) => {
            result.add_error(e.to_string());
            println!("  ✗ {e}");
            return result;
        }
    };

    let partials = engine
        .templates()
        .iter()
        .filter(|t| t.is_partial(&config.export))
        .count();
    let pages = engine.templates().len() - partials;
    println!("  ✓ {pages} page(s), {partials} partial(s) parsed");

    println!("\nChecking server views...");
    check_views(&engine, &mut result);

    println!("\nChecking directories...");
    let public = config.public_dir();
    if public.is_dir() {
        println!("  ✓ {} exists", public.display());
    } else {
        println!("  ⚠ {} missing (optional)", public.display());
    }

    result
}

fn check_views(engine: &TemplateEngine, result: &mut ValidationResult) {
    for view in REQUIRED_VIEWS {
        if engine.has_template(view) {
            println!("  ✓ {view}");
        } else {
            result.add_warning(format!("Missing view '{view}': its route will answer 500"));
            println!("  ⚠ {view} missing");
        }
    }

    for view in OPTIONAL_VIEWS {
        if engine.has_template(view) {
            println!("  ✓ {view}");
        } else {
            result.add_warning(format!("Optional view '{view}' missing: plain-text fallback"));
            println!("  ⚠ {view} missing (optional)");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn complete_site() -> TempDir {
        let dir = TempDir::new().unwrap();
        for view in REQUIRED_VIEWS.iter().chain(OPTIONAL_VIEWS.iter()) {
            write(dir.path(), &format!("views/{view}.tera"), "<p>ok</p>");
        }
        write(dir.path(), "views/partials/_nav.tera", "<nav></nav>");
        dir
    }

    #[test]
    fn test_check_complete_site() {
        let dir = complete_site();
        let result = validate(dir.path(), None);
        assert!(result.errors.is_empty());
        assert!(result.warnings.is_empty());
        assert!(run(dir.path(), None, true).is_ok());
    }

    #[test]
    fn test_check_missing_views_warns() {
        let dir = complete_site();
        fs::remove_file(dir.path().join("views/English.tera")).unwrap();
        fs::remove_file(dir.path().join("views/404.tera")).unwrap();

        let result = validate(dir.path(), None);
        assert!(result.errors.is_empty());
        assert_eq!(result.warnings.len(), 2);
        assert!(result.warnings[0].contains("English"));

        assert!(run(dir.path(), None, false).is_ok());
        assert!(run(dir.path(), None, true).is_err());
    }

    #[test]
    fn test_check_template_syntax_error() {
        let dir = complete_site();
        write(dir.path(), "views/broken.tera", "{% if %}");

        let result = validate(dir.path(), None);
        assert_eq!(result.errors.len(), 1);
        assert!(run(dir.path(), None, false).is_err());
    }

    #[test]
    fn test_check_missing_views_dir() {
        let dir = TempDir::new().unwrap();
        let result = validate(dir.path(), None);
        assert_eq!(result.errors.len(), 1);
    }
}
