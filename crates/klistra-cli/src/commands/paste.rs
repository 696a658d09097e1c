use std::io::{self, IsTerminal};

use klistra_core::{CreatePasteRequest, PasteResponse, ReadPasteRequest, SessionHandle};

use crate::app::AppContext;
use crate::cli::{CreateArgs, ReadArgs, StatusArgs};
use crate::helpers::{parse_duration, prompt_password, read_stdin_text};

pub fn handle_create(ctx: &AppContext, args: &CreateArgs) -> anyhow::Result<()> {
    let text = match &args.text {
        Some(text) => text.clone(),
        None if !args.files.is_empty() && io::stdin().is_terminal() => String::new(),
        None => read_stdin_text()?,
    };

    let expiry = match args.expiry.as_deref() {
        Some(value) => parse_duration(value)?,
        None => ctx.default_expiry(),
    };

    let mut request = CreatePasteRequest::new(text, expiry.as_secs());
    if args.protect {
        let password = match &args.password {
            Some(password) => password.clone(),
            None => prompt_password(true)?,
        };
        request = request.protected_by(password);
    }
    if !args.files.is_empty() {
        request = request.with_files(args.files.clone());
    }

    let store = ctx.open_store()?;
    let service = ctx.service(store);
    let id = service.create(&SessionHandle::random(), &request)?;

    if args.json {
        let out = serde_json::json!({
            "id": id,
            "protected": request.pass_protect,
            "expiry": request.expiry,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        println!("{}", id);
    }
    Ok(())
}

pub fn handle_read(ctx: &AppContext, args: &ReadArgs) -> anyhow::Result<()> {
    let store = ctx.open_existing_store()?;
    let service = ctx.service(store);

    let password = match &args.password {
        Some(password) => password.clone(),
        None if service.status(&args.id)?.protected => prompt_password(false)?,
        None => String::new(),
    };

    let response = service.read(
        &SessionHandle::random(),
        &ReadPasteRequest::new(&args.id, password),
    )?;
    let view = match response {
        PasteResponse::Plain(view) => view,
        // A fresh session never holds a transport key.
        PasteResponse::Sealed(_) => anyhow::bail!("Unexpected transport-sealed response"),
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&view)?);
        return Ok(());
    }

    if view.text.ends_with('\n') {
        print!("{}", view.text);
    } else if !view.text.is_empty() {
        println!("{}", view.text);
    }
    for file in view.files.iter().flatten() {
        println!("file: {}", file);
    }
    Ok(())
}

pub fn handle_status(ctx: &AppContext, args: &StatusArgs) -> anyhow::Result<()> {
    let store = ctx.open_existing_store()?;
    let status = ctx.service(store).status(&args.id)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&status)?);
    } else {
        println!("id={}", status.id);
        println!("protected={}", status.protected);
    }
    Ok(())
}
