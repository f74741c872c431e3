//! Export command - renders the site into a static directory

use std::path::{Path, PathBuf};

use academy_core::Config;
use academy_export::{ExportReport, Exporter};
use color_eyre::eyre::{Result, WrapErr};

/// Run the export command.
///
/// Renders every page template and copies the auxiliary assets into the
/// output directory, which is erased first. A relative `output` is resolved
/// against `root`.
pub fn run(root: &Path, config_path: Option<&Path>, output: Option<&Path>) -> Result<ExportReport> {
    tracing::info!(?root, ?config_path, ?output, "Starting export");

    let config = Config::load(root, config_path).wrap_err("Failed to load configuration")?;
    tracing::debug!(?config, "Loaded configuration");

    let mut exporter = Exporter::new(&config);
    if let Some(dir) = output {
        exporter = exporter.with_output_dir(root.join(dir));
    }

    let report = exporter.run().wrap_err("Export failed")?;
    let out = display_relative(exporter.output_dir(), root);

    for entry in &report.rendered {
        println!(
            "Rendered: {} → {}",
            entry.template,
            out.join(&entry.output).display()
        );
    }
    for asset in &report.copied {
        println!("Copied: {} → {}", asset.name, out.join(&asset.name).display());
    }

    println!();
    println!("  Export completed successfully!");
    println!();
    println!("  Pages:    {}", report.rendered.len());
    println!("  Partials: {} (skipped)", report.partials.len());
    println!("  Assets:   {}", report.copied.len());
    println!();
    println!("  Duration: {}ms", report.duration_ms);
    println!("  Output:   {}", exporter.output_dir().display());
    println!();

    Ok(report)
}

/// Path shown in progress lines, relative to the site root when possible.
fn display_relative(path: &Path, root: &Path) -> PathBuf {
    path.strip_prefix(root)
        .map_or_else(|_| path.to_path_buf(), Path::to_path_buf)
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

    #[test]
    fn test_export_run_with_output_override() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "views/index.tera", "<h1>{{ site.title }}</h1>");
        write(dir.path(), "views/partials/_nav.tera", "<nav></nav>");
        write(dir.path(), "CNAME", "academy.example.com");

        let out = dir.path().join("site-out");
        let report = run(dir.path(), None, Some(&out)).unwrap();

        assert_eq!(report.rendered.len(), 1);
        assert_eq!(report.partials.len(), 1);
        assert_eq!(
            fs::read_to_string(out.join("index.html")).unwrap(),
            "<h1>My Academy</h1>"
        );
        assert!(out.join("CNAME").exists());
        assert!(!dir.path().join("dist").exists());
    }

    #[test]
    fn test_export_run_resolves_relative_output_against_root() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "views/index.tera", "home");

        run(dir.path(), None, Some(Path::new("public_html"))).unwrap();
        assert!(dir.path().join("public_html/index.html").exists());
    }

    #[test]
    fn test_export_run_refuses_root_as_output() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "views/index.tera", "home");
        write(dir.path(), "CNAME", "academy.example.com");

        let result = run(dir.path(), None, Some(dir.path()));
        assert!(result.is_err());
        assert!(dir.path().join("views/index.tera").exists());
        assert!(dir.path().join("CNAME").exists());

        let result = run(dir.path(), None, Some(Path::new(".")));
        assert!(result.is_err());
        assert!(dir.path().join("views/index.tera").exists());
    }

    #[test]
    fn test_export_run_uses_config_file() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "academy.toml", "[site]\ntitle = \"Rainbow\"\n");
        write(dir.path(), "views/index.tera", "{{ site.title }}");

        run(dir.path(), None, None).unwrap();
        assert_eq!(
            fs::read_to_string(dir.path().join("dist/index.html")).unwrap(),
            "Rainbow"
        );
    }

    #[test]
    fn test_export_run_fails_without_views() {
        let dir = TempDir::new().unwrap();
        assert!(run(dir.path(), None, None).is_err());
        assert!(!dir.path().join("dist").exists());
    }

    #[test]
    fn test_display_relative() {
        assert_eq!(
            display_relative(Path::new("/site/dist"), Path::new("/site")),
            PathBuf::from("dist")
        );
        assert_eq!(
            display_relative(Path::new("/elsewhere/out"), Path::new("/site")),
            PathBuf::from("/elsewhere/out")
        );
    }
}
