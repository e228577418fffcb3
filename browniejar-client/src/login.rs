//! CLI auth flows: password grant against the auth plane, token in the OS
//! keyring, config written beside it.

use std::io::{self, Write};
use std::path::PathBuf;

use browniejar_shared::api;

use crate::AppError;
use crate::config::{
    ClientConfig, DEFAULT_REFRESH_SECS, default_config_path, load_config, normalize_service_url,
    resolve_config_path, save_config,
};
use crate::session::Session;

pub async fn login(
    service_arg: Option<String>,
    email_arg: Option<String>,
    cfg_path_opt: Option<PathBuf>,
) -> Result<(), AppError> {
    let (service_url, anon_key) = resolve_gateway(service_arg, cfg_path_opt)?;
    let email = match email_arg {
        Some(e) => e,
        None => prompt("Email: ")?,
    };
    let password = rpassword::prompt_password("Password: ")
        .map_err(|e| AppError::Io(std::io::Error::other(e.to_string())))?;

    let resp = api::rest::sign_in(
        &service_url,
        &anon_key,
        &api::PasswordGrantReq {
            email: email.clone(),
            password,
        },
    )
    .await?;
    let session = Session::from_token(&resp.access_token)?;

    let path = persist(&service_url, &anon_key, &session.token)?;
    println!(
        "Signed in as {} ({}); config written to {}",
        email,
        session.user_id,
        path.display()
    );
    Ok(())
}

pub async fn signup(
    service_arg: Option<String>,
    email_arg: Option<String>,
    name_arg: Option<String>,
    cfg_path_opt: Option<PathBuf>,
) -> Result<(), AppError> {
    let (service_url, anon_key) = resolve_gateway(service_arg, cfg_path_opt)?;
    let email = match email_arg {
        Some(e) => e,
        None => prompt("Email: ")?,
    };
    let name = match name_arg {
        Some(n) => n,
        None => prompt("Display name: ")?,
    };
    if name.trim().is_empty() {
        return Err(AppError::Validation("display name must not be empty".into()));
    }
    let password = rpassword::prompt_password("Password: ")
        .map_err(|e| AppError::Io(std::io::Error::other(e.to_string())))?;
    let confirm = rpassword::prompt_password("Confirm password: ")
        .map_err(|e| AppError::Io(std::io::Error::other(e.to_string())))?;
    if password != confirm {
        return Err(AppError::Validation("passwords do not match".into()));
    }

    let resp = api::rest::sign_up(
        &service_url,
        &anon_key,
        &api::SignUpReq {
            email: email.clone(),
            password,
        },
    )
    .await?;
    let session = Session::from_token(&resp.access_token)?;

    // The profile row goes through a privileged RPC; direct table writes
    // stay closed under row-level security.
    api::rest::create_profile(
        &service_url,
        &anon_key,
        &session.token,
        &api::CreateProfileArgs {
            user_id: &session.user_id.0,
            name: name.trim(),
            email: &email,
        },
    )
    .await?;

    let path = persist(&service_url, &anon_key, &session.token)?;
    println!(
        "Created profile {} ({}); config written to {}",
        name.trim(),
        email,
        path.display()
    );
    println!("Link your partner with `browniejar partner link <email>`");
    Ok(())
}

pub fn logout(cfg_path_opt: Option<PathBuf>) -> Result<(), AppError> {
    let path = resolve_config_path(cfg_path_opt)?;
    let cfg = load_config(&path)?;
    let entry = crate::keyring_entry(&cfg.service_url)?;
    match entry.delete_credential() {
        Ok(()) => println!("Signed out; token removed from the keyring"),
        Err(keyring::Error::NoEntry) => println!("No saved session"),
        Err(e) => return Err(AppError::Keyring(e.to_string())),
    }
    Ok(())
}

/// Service URL and anon key: CLI arg > existing config > prompt. The key is
/// reused from config only when it belongs to the same gateway.
fn resolve_gateway(
    service_arg: Option<String>,
    cfg_path_opt: Option<PathBuf>,
) -> Result<(String, String), AppError> {
    let existing = (|| {
        let p = resolve_config_path(cfg_path_opt).ok()?;
        load_config(&p).ok()
    })();
    let service_url = match service_arg {
        Some(s) => normalize_service_url(&s),
        None => match &existing {
            Some(cfg) => normalize_service_url(&cfg.service_url),
            None => normalize_service_url(&prompt(
                "Gateway URL (e.g., https://abcdefgh.supabase.co): ",
            )?),
        },
    };
    let anon_key = match existing
        .as_ref()
        .filter(|c| normalize_service_url(&c.service_url) == service_url)
    {
        Some(cfg) => cfg.anon_key.clone(),
        None => prompt("Anon key: ")?,
    };
    Ok((service_url, anon_key))
}

fn persist(service_url: &str, anon_key: &str, token: &str) -> Result<PathBuf, AppError> {
    let entry = crate::keyring_entry(service_url)?;
    entry
        .set_password(token)
        .map_err(|e| AppError::Keyring(e.to_string()))?;
    let path = default_config_path()
        .ok_or_else(|| AppError::Config("could not determine config dir".into()))?;
    let refresh_secs = load_config(&path)
        .map(|c| c.refresh_secs)
        .unwrap_or(DEFAULT_REFRESH_SECS);
    let cfg = ClientConfig {
        service_url: service_url.to_string(),
        anon_key: anon_key.to_string(),
        refresh_secs,
    };
    save_config(&path, &cfg)?;
    Ok(path)
}

fn prompt(msg: &str) -> Result<String, AppError> {
    print!("{}", msg);
    io::stdout().flush().ok();
    let mut buf = String::new();
    io::stdin().read_line(&mut buf).map_err(AppError::Io)?;
    Ok(buf.trim().to_string())
}
