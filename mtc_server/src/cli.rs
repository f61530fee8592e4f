use std::{env, env::VarError};

/// There's no real CLI for the server, so just do quick 'n dirty
pub fn handle_command_line_args() -> bool {
    let has_cli_args = env::args().count() > 1;
    if has_cli_args {
        // We don't expect any CLI args, so always print the help
        display_readme();
        display_envs();
    }
    has_cli_args
}

fn display_readme() {
    const README: &str = include_str!("./cli-help.txt");
    println!("\n{README}\n");
}

fn display_envs() {
    // MTC_SMTP_PASSWORD is deliberately left out
    const DISPLAY_ENVS: [&str; 12] = [
        "RUST_LOG",
        "MTC_HOST",
        "MTC_PORT",
        "MTC_DATABASE_URL",
        "MTC_CHECK_INTERVAL",
        "MTC_TGVMAX_BASE_URL",
        "MTC_TGVMAX_TIMEOUT",
        "MTC_TGVMAX_TIMEZONE",
        "MTC_TGVMAX_LANG",
        "MTC_SMTP_SERVER",
        "MTC_SMTP_PORT",
        "MTC_SMTP_USER",
    ];

    println!("Current environment values (EXCLUDING variables that contain secrets):");
    DISPLAY_ENVS.iter().for_each(|&name| {
        let val = match env::var(name) {
            Ok(s) => s,
            Err(VarError::NotPresent) => "Not set".into(),
            Err(VarError::NotUnicode(s)) => format!("Invalid value: {}", s.to_string_lossy()),
        };
        println!("  {name:<35} {val:<15}");
    })
}
