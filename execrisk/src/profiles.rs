//! Static risk profiles for well-known commands. Matching is by basename so
//! `/usr/bin/sudo` and `sudo` classify identically.

/// Escalation metadata for a privilege-escalation command.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct EscalationProfile {
    pub escalation_type: &'static str,
    pub required_privileges: &'static [&'static str],
}

pub(crate) fn escalation_profile(basename: &str) -> Option<EscalationProfile> {
    match basename {
        "sudo" => Some(EscalationProfile {
            escalation_type: "sudo",
            required_privileges: &["root"],
        }),
        "su" => Some(EscalationProfile {
            escalation_type: "su",
            required_privileges: &["root"],
        }),
        "doas" => Some(EscalationProfile {
            escalation_type: "doas",
            required_privileges: &["root"],
        }),
        _ => None,
    }
}

pub(crate) fn is_destructive_command(basename: &str) -> bool {
    matches!(basename, "rm" | "rmdir" | "unlink" | "shred" | "dd")
}

/// Commands whose destructive behavior is carried by their arguments:
/// `find -delete`, `find -exec <destructive>`, `rsync --delete*`.
pub(crate) fn has_destructive_arguments(basename: &str, args: &[String]) -> Option<&'static str> {
    match basename {
        "find" => {
            for (idx, arg) in args.iter().enumerate() {
                if arg == "-delete" {
                    return Some("find -delete");
                }
                if arg == "-exec"
                    && let Some(exec_cmd) = args.get(idx + 1)
                    && is_destructive_command(exec_cmd)
                {
                    return Some("find -exec");
                }
            }
            None
        }
        "rsync" => args
            .iter()
            .any(|arg| {
                matches!(arg.as_str(), "--delete" | "--delete-before" | "--delete-after")
            })
            .then_some("rsync --delete"),
        _ => None,
    }
}

/// Commands that always talk to the network regardless of arguments.
pub(crate) fn is_always_network(basename: &str) -> bool {
    matches!(
        basename,
        "curl" | "wget" | "nc" | "netcat" | "telnet" | "ssh" | "scp" | "aws"
    )
}

/// Subcommands that make `git` a network operation.
pub(crate) fn is_git_network_subcommand(subcommand: &str) -> bool {
    matches!(subcommand, "clone" | "fetch" | "pull" | "push" | "remote")
}

pub(crate) fn is_system_modification(basename: &str, args: &[String]) -> bool {
    if matches!(
        basename,
        "systemctl"
            | "service"
            | "chkconfig"
            | "update-rc.d"
            | "mount"
            | "umount"
            | "fdisk"
            | "parted"
            | "mkfs"
            | "fsck"
            | "crontab"
            | "at"
            | "batch"
    ) {
        return true;
    }

    // Package managers only count when actually installing or removing.
    if matches!(
        basename,
        "apt" | "apt-get" | "yum" | "dnf" | "zypper" | "pacman" | "brew" | "pip" | "npm" | "yarn"
    ) {
        return args.iter().any(|arg| {
            matches!(
                arg.as_str(),
                "install" | "remove" | "uninstall" | "upgrade" | "update"
            )
        });
    }

    false
}

/// Returns the first non-option argument, skipping options and the values of
/// options known to take one (`git -C <dir> pull` must find `pull`).
pub(crate) fn find_first_subcommand(args: &[String]) -> Option<&str> {
    let options_with_value = [
        "-c",
        "-C",
        "--work-tree",
        "--git-dir",
        "--config",
        "--namespace",
    ];

    let mut skip_next = false;
    for arg in args {
        if skip_next {
            skip_next = false;
            continue;
        }
        if arg.starts_with('-') {
            if !arg.contains('=') && options_with_value.contains(&arg.as_str()) {
                skip_next = true;
            }
            continue;
        }
        return Some(arg);
    }
    None
}

/// True when any argument looks like a remote endpoint: a URL scheme or an
/// scp-style `user@host:path` address.
pub(crate) fn has_network_arguments(args: &[String]) -> bool {
    args.iter().any(|arg| {
        if arg.contains("://") {
            return true;
        }
        is_ssh_style_address(arg)
    })
}

fn is_ssh_style_address(arg: &str) -> bool {
    if arg.starts_with('-') || arg.contains("://") {
        return false;
    }
    match arg.split_once('@') {
        Some((user, rest)) => !user.is_empty() && rest.contains(':'),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escalation_profiles_cover_the_known_commands() {
        for cmd in ["sudo", "su", "doas"] {
            let profile = escalation_profile(cmd).unwrap();
            assert_eq!(profile.escalation_type, cmd);
            assert!(!profile.required_privileges.is_empty());
        }
        assert!(escalation_profile("sudoedit-not-really").is_none());
        assert!(escalation_profile("ls").is_none());
    }

    #[test]
    fn find_first_subcommand_skips_options_and_their_values() {
        let args: Vec<String> = ["-C", "/repo", "--paginate", "pull", "origin"]
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(find_first_subcommand(&args), Some("pull"));

        let args: Vec<String> = ["--git-dir=/repo/.git", "status"]
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(find_first_subcommand(&args), Some("status"));

        let args: Vec<String> = ["-v", "--paginate"].iter().map(ToString::to_string).collect();
        assert_eq!(find_first_subcommand(&args), None);
    }

    #[test]
    fn ssh_style_addresses_are_detected() {
        assert!(is_ssh_style_address("user@example.com:/srv/backup"));
        assert!(!is_ssh_style_address("user@example.com"));
        assert!(!is_ssh_style_address("-user@host:path"));
        assert!(!is_ssh_style_address("https://user@example.com:443"));
        assert!(!is_ssh_style_address("plain-arg"));
    }
}
