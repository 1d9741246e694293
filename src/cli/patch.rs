//! `vise patch`: run the source patcher over the loaded sections.

use anyhow::{Result, bail};

use super::args::PatchArgs;
use super::common::{load_sources, print_diff};
use crate::config::ViseConfig;
use crate::preview::mutate::Property;
use crate::source::loader::write_changed;
use crate::source::{PatchOutcome, SourceSet, patch};

pub fn run_patch(args: &PatchArgs, config: &ViseConfig) -> Result<()> {
    let (sources, _) = load_sources(config)?;
    let property = Property::from(args.property.as_str());

    let (patched, outcome) = apply(&sources, &property, &args.old, &args.new);
    match &outcome {
        PatchOutcome::Patched { path, strategy } => {
            crate::log!("patch"; "{} in {} ({})", property, path, strategy.label());
            print_diff(
                path,
                sources.get(path).unwrap_or_default(),
                patched.get(path).unwrap_or_default(),
            );
        }
        PatchOutcome::NoMatch => {
            crate::log!("patch"; "no source matches {:?}, nothing changed", args.old);
            return Ok(());
        }
        PatchOutcome::Unsupported => {
            bail!("`{}` is not reflected into source (textContent and className are)", property)
        }
    }

    if args.write {
        for file in write_changed(&patched, &sources, &config.sections_dir())? {
            crate::log!("patch"; "wrote {}", file.display());
        }
    }
    Ok(())
}

/// Patch a copy of `sources`.
fn apply(sources: &SourceSet, property: &Property, old: &str, new: &str) -> (SourceSet, PatchOutcome) {
    let mut patched = sources.clone();
    let outcome = patch(&mut patched, property, old, new);
    (patched, outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::patch::Strategy;

    fn sources() -> SourceSet {
        let mut set = SourceSet::new("/App.tsx");
        set.insert("/App.tsx", "<main><Hero /></main>");
        set.insert("/Hero.tsx", "<h1 className=\"text-lg\">Hello</h1>");
        set
    }

    #[test]
    fn test_apply_leaves_input_untouched() {
        let original = sources();
        let (patched, outcome) = apply(&original, &Property::TextContent, "Hello", "Hi");
        assert_eq!(
            outcome,
            PatchOutcome::Patched {
                path: "/Hero.tsx".into(),
                strategy: Strategy::TagContent
            }
        );
        assert_eq!(original, sources());
        assert_eq!(patched.get("/Hero.tsx"), Some("<h1 className=\"text-lg\">Hi</h1>"));
    }

    #[test]
    fn test_run_patch_writes_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let sections = dir.path().join("sections");
        std::fs::create_dir(&sections).unwrap();
        std::fs::write(
            sections.join("HeroSection.tsx"),
            "export default function HeroSection() {\n  return (\n    <h1>Old title</h1>\n  );\n}",
        )
        .unwrap();

        let mut config = ViseConfig::default();
        config.root = dir.path().to_path_buf();
        config.sections.names = vec!["HeroSection".into()];

        let args = PatchArgs {
            property: "textContent".into(),
            old: "Old title".into(),
            new: "New title".into(),
            write: true,
        };
        run_patch(&args, &config).unwrap();

        let hero = std::fs::read_to_string(sections.join("HeroSection.tsx")).unwrap();
        assert!(hero.contains("<h1>New title</h1>"));
        assert!(!sections.join("App.tsx").exists());
    }

    #[test]
    fn test_run_patch_rejects_style_properties() {
        let dir = tempfile::TempDir::new().unwrap();
        let mut config = ViseConfig::default();
        config.root = dir.path().to_path_buf();
        let args = PatchArgs {
            property: "color".into(),
            old: "#000000".into(),
            new: "#ff0000".into(),
            write: false,
        };
        assert!(run_patch(&args, &config).is_err());
    }
}
