// ABOUTME: Integration tests for profile loading and target selection.
// ABOUTME: Tests YAML parsing, discovery order, the bundled list, and selectors.

use imgprobe::config::*;
use imgprobe::error::ConfigError;
use imgprobe::runtime::RuntimeType;
use std::fs;
use std::time::Duration;

fn tags(profiles: &[Profile]) -> Vec<&str> {
    profiles.iter().map(|p| p.image_tag.as_str()).collect()
}

mod parsing {
    use super::*;

    #[test]
    fn parse_minimal_document() {
        let yaml = r#"
profiles:
  - image_tag: alpine_latest
    base_image: alpine:latest
"#;
        let set = ProfileSet::from_yaml(yaml).unwrap();
        assert_eq!(set.profiles.len(), 1);
        assert_eq!(set.profiles.head.base_image.to_string(), "alpine:latest");
        assert!(set.profiles.head.commands.is_empty());
        assert_eq!(set.default_command(), DEFAULT_COMMAND);
    }

    #[test]
    fn parse_full_document() {
        let yaml = r#"
default_command: uname -a

engine:
  runtime: podman
  socket: /run/user/1000/podman/podman.sock
  timeout: 30s

profiles:
  - image_tag: py312_slim
    base_image: python:3.12-slim
    commands:
      - pip install requests
      - python -c "import requests"
    package_manager: pip
  - image_tag: ubi9
    base_image: registry.access.redhat.com/ubi9/ubi:latest
"#;
        let set = ProfileSet::from_yaml(yaml).unwrap();
        assert_eq!(set.default_command(), "uname -a");
        assert_eq!(set.engine.runtime, Some(RuntimeType::Podman));
        assert_eq!(
            set.engine.socket.as_deref(),
            Some("/run/user/1000/podman/podman.sock")
        );
        assert_eq!(set.engine.timeout, Duration::from_secs(30));

        let py = &set.profiles.head;
        assert_eq!(py.commands.len(), 2);
        assert_eq!(py.package_manager.as_deref(), Some("pip"));
        assert_eq!(py.first_command(), Some("pip install requests"));

        let ubi = &set.profiles.tail[0];
        assert_eq!(
            ubi.base_image.registry(),
            Some("registry.access.redhat.com")
        );
    }

    #[test]
    fn engine_section_defaults() {
        let yaml = r#"
profiles:
  - image_tag: a
    base_image: alpine
"#;
        let set = ProfileSet::from_yaml(yaml).unwrap();
        assert_eq!(set.engine.runtime, None);
        assert_eq!(set.engine.timeout, Duration::from_secs(120));
    }

    #[test]
    fn blank_default_command_falls_back() {
        let yaml = r#"
default_command: "   "
profiles:
  - image_tag: a
    base_image: alpine
"#;
        let set = ProfileSet::from_yaml(yaml).unwrap();
        assert_eq!(set.default_command(), "cat /etc/os-release");
    }

    #[test]
    fn empty_profile_list_rejected() {
        let err = ProfileSet::from_yaml("profiles: []\n").unwrap_err();
        assert!(err.to_string().contains("at least one profile"));
    }

    #[test]
    fn unknown_field_rejected() {
        let yaml = r#"
profiles:
  - image_tag: a
    base_image: alpine
    entrypoint: /bin/sh
"#;
        assert!(ProfileSet::from_yaml(yaml).is_err());
    }

    #[test]
    fn invalid_image_tag_rejected() {
        let yaml = r#"
profiles:
  - image_tag: Alpine
    base_image: alpine
"#;
        let err = ProfileSet::from_yaml(yaml).unwrap_err();
        assert!(err.to_string().contains("image_tag 'Alpine'"));
    }

    #[test]
    fn invalid_base_image_rejected() {
        let yaml = r#"
profiles:
  - image_tag: a
    base_image: "alpine latest"
"#;
        let err = ProfileSet::from_yaml(yaml).unwrap_err();
        assert!(err.to_string().contains("base_image"));
    }

    #[test]
    fn bad_timeout_rejected() {
        let yaml = r#"
engine:
  timeout: soon
profiles:
  - image_tag: a
    base_image: alpine
"#;
        assert!(ProfileSet::from_yaml(yaml).is_err());
    }
}

mod bundled {
    use super::*;

    #[test]
    fn bundled_list_loads_in_order() {
        let set = ProfileSet::bundled().unwrap();
        let all: Vec<Profile> = set.profiles.iter().cloned().collect();
        assert_eq!(all.len(), 13);
        assert_eq!(all[0].image_tag.as_str(), "py312_trixie");
        assert_eq!(all[12].image_tag.as_str(), "alpine_3_17");
    }

    #[test]
    fn bundled_tags_are_unique() {
        let set = ProfileSet::bundled().unwrap();
        let mut seen = std::collections::HashSet::new();
        for profile in set.profiles.iter() {
            assert!(seen.insert(profile.image_tag.as_str()), "{}", profile.image_tag);
        }
    }
}

mod discovery {
    use super::*;

    const DOC: &str = "profiles:\n  - image_tag: local\n    base_image: alpine\n";

    #[test]
    fn falls_back_to_bundled() {
        let dir = tempfile::tempdir().unwrap();
        let (set, source) = ProfileSet::resolve(None, dir.path()).unwrap();
        assert_eq!(source, ProfileSource::Bundled);
        assert_eq!(set.profiles.len(), 13);
    }

    #[test]
    fn finds_imgprobe_yml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        fs::write(&path, DOC).unwrap();

        let (set, source) = ProfileSet::resolve(None, dir.path()).unwrap();
        assert_eq!(source, ProfileSource::File(path));
        assert_eq!(set.profiles.head.image_tag.as_str(), "local");
    }

    #[test]
    fn finds_dot_directory_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join(".imgprobe")).unwrap();
        fs::write(dir.path().join(CONFIG_FILENAME_DIR), DOC).unwrap();

        assert_eq!(
            ProfileSet::discover(dir.path()),
            Some(dir.path().join(".imgprobe/profiles.yml"))
        );
    }

    #[test]
    fn yml_preferred_over_yaml() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(CONFIG_FILENAME), DOC).unwrap();
        fs::write(dir.path().join(CONFIG_FILENAME_ALT), DOC).unwrap();

        assert_eq!(
            ProfileSet::discover(dir.path()),
            Some(dir.path().join(CONFIG_FILENAME))
        );
    }

    #[test]
    fn explicit_path_must_exist() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.yml");
        let err = ProfileSet::resolve(Some(&missing), dir.path()).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(p) if p == missing));
    }

    #[test]
    fn parse_error_names_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        fs::write(&path, "profiles: {").unwrap();

        let err = ProfileSet::resolve(None, dir.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains("imgprobe.yml"));
    }
}

mod selection {
    use super::*;

    fn set() -> ProfileSet {
        ProfileSet::from_yaml(
            r#"
profiles:
  - image_tag: alpine_latest
    base_image: alpine:latest
  - image_tag: debian_bookworm
    base_image: debian:bookworm-slim
    commands:
      - apt-get update
  - image_tag: fedora_latest
    base_image: fedora:latest
"#,
        )
        .unwrap()
    }

    #[test]
    fn all_keeps_document_order() {
        let profiles = set().select(&Target::All, None).unwrap();
        assert_eq!(
            tags(&profiles),
            ["alpine_latest", "debian_bookworm", "fedora_latest"]
        );
    }

    #[test]
    fn all_ignores_custom_name() {
        let profiles = set().select(&Target::All, Some("mine")).unwrap();
        assert_eq!(profiles.len(), 3);
        assert_eq!(profiles[0].image_tag.as_str(), "alpine_latest");
    }

    #[test]
    fn exact_tag_selects_one() {
        let target: Target = "debian_bookworm".parse().unwrap();
        let profiles = set().select(&target, None).unwrap();
        assert_eq!(tags(&profiles), ["debian_bookworm"]);
        assert_eq!(profiles[0].commands, ["apt-get update"]);
    }

    #[test]
    fn custom_name_is_lowercased() {
        let target: Target = "debian_bookworm".parse().unwrap();
        let profiles = set().select(&target, Some("MyDebian")).unwrap();
        assert_eq!(tags(&profiles), ["mydebian"]);
        assert_eq!(profiles[0].base_image.to_string(), "debian:bookworm-slim");
    }

    #[test]
    fn custom_name_must_be_alphanumeric() {
        let target: Target = "debian_bookworm".parse().unwrap();
        let err = set().select(&target, Some("my_debian")).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidName(n) if n == "my_debian"));
    }

    #[test]
    fn unknown_selector_rejected() {
        let target: Target = "nonexistent".parse().unwrap();
        let err = set().select(&target, None).unwrap_err();
        assert!(matches!(err, ConfigError::UnknownProfile(ref s) if s == "nonexistent"));
        assert!(err.to_string().contains("unknown profile"));
    }

    #[test]
    fn image_reference_becomes_ad_hoc_profile() {
        let target: Target = "python:3.12-slim".parse().unwrap();
        let profiles = set().select(&target, None).unwrap();
        assert_eq!(tags(&profiles), ["python312slim"]);
        assert_eq!(profiles[0].base_image.to_string(), "python:3.12-slim");
        assert!(profiles[0].commands.is_empty());
    }

    #[test]
    fn ad_hoc_profile_takes_custom_name() {
        let target: Target = "ghcr.io/org/tool:1.0".parse().unwrap();
        let profiles = set().select(&target, Some("tool")).unwrap();
        assert_eq!(tags(&profiles), ["tool"]);
        assert_eq!(profiles[0].base_image.registry(), Some("ghcr.io"));
    }

    #[test]
    fn empty_target_rejected() {
        assert!(matches!(
            "  ".parse::<Target>(),
            Err(ConfigError::EmptyTarget)
        ));
    }
}
