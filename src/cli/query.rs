//! Read-only progress commands: status and tutorials

use anyhow::Result;

use super::session::Session;
use super::Output;

/// Shows one tutorial's header, progress and step grid
pub fn status(output: &Output, tutorial: Option<&str>) -> Result<()> {
    let session = Session::open()?;
    let doc_type = session.doc_type(tutorial)?;
    let orchestrator = session.into_orchestrator(doc_type);

    let grid = orchestrator.grid();
    let progress = orchestrator.progress();
    let Some(meta) = orchestrator.tutorial() else {
        return Ok(());
    };

    if output.is_json() {
        output.data(&serde_json::json!({
            "tutorial": orchestrator.doc_type(),
            "title": meta.title,
            "description": meta.description,
            "scenes": meta.scenes,
            "video_url": meta.video_url,
            "progress": {
                "completed": progress.completed,
                "total": progress.total,
                "percent": progress.percent(),
            },
            "grid": grid,
        }));
        return Ok(());
    }

    println!("{}", meta.title);
    println!("{}", "=".repeat(meta.title.chars().count().max(10)));
    if !meta.description.is_empty() {
        println!("{}", meta.description);
    }
    if !meta.scenes.is_empty() {
        println!();
        println!("Scenes:");
        for scene in &meta.scenes {
            println!("  - {}", scene);
        }
    }
    if let Some(url) = &meta.video_url {
        println!();
        println!("Video: {}", url);
    }

    println!();
    println!(
        "Progress: {}/{} ({}%)",
        progress.completed,
        progress.total,
        progress.percent()
    );

    for row in &grid.rows {
        println!();
        println!("Step {}: {}", row.number, row.title);
        for (tool, cell) in grid.tools.iter().zip(&row.cells) {
            if cell.links.is_empty() {
                continue;
            }
            println!("  {}", tool.title);
            for link in &cell.links {
                let mark = if link.complete { "[x]" } else { "[ ]" };
                println!("    {} {:<28} {}", mark, link.id.as_str(), link.title);
            }
        }
    }

    Ok(())
}

/// Lists all tutorials with their progress
pub fn tutorials(output: &Output) -> Result<()> {
    let session = Session::open()?;
    let completed = session.project().progress_store().get_complete_docs();
    let tree = &session.config().tree;
    let default = &session.project().config().project.default_tutorial;

    let rows: Vec<_> = tree
        .tutorials()
        .map(|(doc_type, tutorial)| (doc_type, tutorial, completed.progress_in(tree, doc_type)))
        .collect();

    if output.is_json() {
        let items: Vec<_> = rows
            .iter()
            .map(|(doc_type, tutorial, progress)| {
                serde_json::json!({
                    "id": doc_type,
                    "title": tutorial.title,
                    "steps": tutorial.steps.len(),
                    "default": *doc_type == default,
                    "completed": progress.completed,
                    "total": progress.total,
                })
            })
            .collect();
        output.data(&items);
    } else if rows.is_empty() {
        println!("No tutorials configured");
    } else {
        println!("{:<2}{:<16} {:<10} TITLE", "", "ID", "PROGRESS");
        for (doc_type, tutorial, progress) in &rows {
            let marker = if *doc_type == default { "*" } else { "" };
            println!(
                "{:<2}{:<16} {:<10} {}",
                marker,
                doc_type.as_str(),
                format!("{}/{}", progress.completed, progress.total),
                tutorial.title
            );
        }
    }

    Ok(())
}
