// SPDX-License-Identifier: MIT
//! Invocation builder — translates a [`RenderJob`] into the renderer's
//! command line.
//!
//! The result is a discrete argument vector handed to the process spawner
//! as-is. Nothing here ever passes through a shell, so URL and script-text
//! fields need no quoting or escaping — injection safety is structural.

use std::path::{Path, PathBuf};

use crate::renderer::model::{OutputMode, RenderJob};

/// An immutable, ordered argument list for one renderer process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    program: PathBuf,
    args: Vec<String>,
}

impl Invocation {
    /// Build the argument list for `job`. Pure and deterministic: identical
    /// inputs always produce identical sequences, and absent optional fields
    /// emit no flags at all.
    ///
    /// `screenshot_path` is the temp artifact reserved by the orchestrator;
    /// it is only consulted in screenshot mode.
    pub fn build(program: &Path, job: &RenderJob, screenshot_path: Option<&Path>) -> Self {
        let mut args = vec![job.url.clone(), "--wait".into(), job.wait.to_string()];

        if let Some(profile_dir) = &job.profile_dir {
            args.push("--profile".into());
            args.push(profile_dir.to_string_lossy().into_owned());
        }

        for action in &job.type_actions {
            args.push("--type".into());
            args.push(action.selector.clone());
            args.push(action.value.clone());
        }

        for selector in &job.click_actions {
            args.push("--click".into());
            args.push(selector.clone());
        }

        if let Some(post_wait) = job.post_wait {
            args.push("--post-wait".into());
            args.push(post_wait.to_string());
        }

        if let Some(exec_js) = &job.exec_js {
            args.push("--exec-js".into());
            args.push(exec_js.clone());
        }

        if let Some(post_js) = &job.post_js {
            args.push("--post-js".into());
            args.push(post_js.clone());
        }

        match job.mode {
            OutputMode::Html => {}
            OutputMode::Screenshot { width, height } => {
                if let Some(path) = screenshot_path {
                    args.push("--screenshot".into());
                    args.push(path.to_string_lossy().into_owned());
                }
                args.push("--width".into());
                args.push(width.to_string());
                args.push("--height".into());
                args.push(height.to_string());
            }
            OutputMode::Network => {
                args.push("--only-network".into());
            }
        }

        Self {
            program: program.to_path_buf(),
            args,
        }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::model::TypeAction;
    use proptest::prelude::*;

    const RENDERER: &str = "/opt/js-web-renderer/bin/fetch-rendered.py";

    #[test]
    fn minimal_job_emits_url_and_wait_only() {
        let job = RenderJob::html("https://example.com");
        let inv = Invocation::build(Path::new(RENDERER), &job, None);
        assert_eq!(inv.args(), &["https://example.com", "--wait", "5"]);
        assert_eq!(inv.program(), Path::new(RENDERER));
    }

    #[test]
    fn optional_fields_appear_in_fixed_order() {
        let mut job = RenderJob::html("https://example.com/login");
        job.wait = 10;
        job.profile_dir = Some("/opt/js-web-renderer/profiles/work".into());
        job.type_actions = vec![
            TypeAction {
                selector: "#user".into(),
                value: "alice".into(),
            },
            TypeAction {
                selector: "#pass".into(),
                value: "s3cret".into(),
            },
        ];
        job.click_actions = vec!["#submit".into()];
        job.post_wait = Some(15);
        job.exec_js = Some("console.log(1)".into());
        job.post_js = Some("window.scrollTo(0, 9999)".into());

        let inv = Invocation::build(Path::new(RENDERER), &job, None);
        assert_eq!(
            inv.args(),
            &[
                "https://example.com/login",
                "--wait",
                "10",
                "--profile",
                "/opt/js-web-renderer/profiles/work",
                "--type",
                "#user",
                "alice",
                "--type",
                "#pass",
                "s3cret",
                "--click",
                "#submit",
                "--post-wait",
                "15",
                "--exec-js",
                "console.log(1)",
                "--post-js",
                "window.scrollTo(0, 9999)",
            ]
        );
    }

    #[test]
    fn screenshot_mode_appends_path_and_viewport() {
        let mut job = RenderJob::html("https://example.com");
        job.mode = OutputMode::Screenshot {
            width: 800,
            height: 600,
        };
        let inv = Invocation::build(
            Path::new(RENDERER),
            &job,
            Some(Path::new("/tmp/renderd-abc.png")),
        );
        assert_eq!(
            inv.args(),
            &[
                "https://example.com",
                "--wait",
                "5",
                "--screenshot",
                "/tmp/renderd-abc.png",
                "--width",
                "800",
                "--height",
                "600",
            ]
        );
    }

    #[test]
    fn network_mode_appends_only_network_flag() {
        let mut job = RenderJob::html("https://example.com");
        job.mode = OutputMode::Network;
        let inv = Invocation::build(Path::new(RENDERER), &job, None);
        assert_eq!(
            inv.args(),
            &["https://example.com", "--wait", "5", "--only-network"]
        );
    }

    #[test]
    fn shell_metacharacters_pass_through_verbatim() {
        // Arguments are discrete tokens; nothing gets quoted or mangled.
        let mut job = RenderJob::html("https://example.com/?q=a&b=$(rm -rf /);`x`");
        job.exec_js = Some("fetch('http://evil/; echo pwned')".into());
        let inv = Invocation::build(Path::new(RENDERER), &job, None);
        assert_eq!(inv.args()[0], "https://example.com/?q=a&b=$(rm -rf /);`x`");
        assert_eq!(inv.args()[4], "fetch('http://evil/; echo pwned')");
    }

    fn arb_job() -> impl Strategy<Value = RenderJob> {
        (
            "[a-z]{1,12}",
            0u32..=60,
            proptest::option::of("[a-z0-9_-]{1,16}"),
            proptest::collection::vec(("[a-z#.]{1,8}", "[a-z0-9 ]{0,8}"), 0..3),
            proptest::collection::vec("[a-z#.]{1,8}", 0..3),
            proptest::option::of(0u32..=120),
            proptest::option::of("[a-z(); ]{0,20}"),
            prop_oneof![
                Just(OutputMode::Html),
                Just(OutputMode::Network),
                (320u32..=3840, 240u32..=2160)
                    .prop_map(|(width, height)| OutputMode::Screenshot { width, height }),
            ],
        )
            .prop_map(
                |(host, wait, profile, types, clicks, post_wait, post_js, mode)| RenderJob {
                    url: format!("https://{host}.test/"),
                    wait,
                    profile_dir: profile.map(|p| PathBuf::from("/profiles").join(p)),
                    type_actions: types
                        .into_iter()
                        .map(|(selector, value)| TypeAction { selector, value })
                        .collect(),
                    click_actions: clicks,
                    post_wait,
                    exec_js: None,
                    post_js,
                    mode,
                },
            )
    }

    proptest! {
        #[test]
        fn build_is_deterministic(job in arb_job()) {
            let shot = Path::new("/tmp/renderd-shot.png");
            let a = Invocation::build(Path::new(RENDERER), &job, Some(shot));
            let b = Invocation::build(Path::new(RENDERER), &job, Some(shot));
            prop_assert_eq!(a, b);
        }

        #[test]
        fn absent_optionals_emit_no_flags(job in arb_job()) {
            let inv = Invocation::build(Path::new(RENDERER), &job, Some(Path::new("/tmp/s.png")));
            let args = inv.args();
            prop_assert_eq!(args.iter().filter(|a| *a == "--profile").count(),
                usize::from(job.profile_dir.is_some()));
            prop_assert_eq!(args.iter().filter(|a| *a == "--type").count(), job.type_actions.len());
            prop_assert_eq!(args.iter().filter(|a| *a == "--click").count(), job.click_actions.len());
            prop_assert_eq!(args.iter().filter(|a| *a == "--post-wait").count(),
                usize::from(job.post_wait.is_some()));
            prop_assert_eq!(args.iter().filter(|a| *a == "--exec-js").count(), 0);
            prop_assert_eq!(args.iter().filter(|a| *a == "--post-js").count(),
                usize::from(job.post_js.is_some()));
            prop_assert_eq!(args.iter().filter(|a| *a == "--only-network").count(),
                usize::from(job.mode == OutputMode::Network));
        }
    }
}
