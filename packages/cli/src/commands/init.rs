use crate::config::{Config, DEFAULT_CONFIG_NAME};
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use pagesmith_common::{write_document, RealFileSystem};
use pagesmith_document::{IdGenerator, Layout, Node, NodeType, Overrides};
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct InitArgs {
    /// Page document to create
    #[arg(short, long, default_value = "page.json")]
    pub document: String,

    /// Force overwrite existing files
    #[arg(short, long)]
    pub force: bool,
}

pub fn init(args: InitArgs, cwd: &str) -> Result<()> {
    let config_path = PathBuf::from(cwd).join(DEFAULT_CONFIG_NAME);

    // Check if config already exists
    if config_path.exists() && !args.force {
        println!(
            "{} {} already exists",
            "⚠️".yellow(),
            DEFAULT_CONFIG_NAME.bright_white()
        );
        println!("Use --force to overwrite");
        return Ok(());
    }

    println!("{}", "📝 Initializing Pagesmith project...".bright_blue().bold());

    let document_path = PathBuf::from(cwd).join(&args.document);
    if !document_path.exists() || args.force {
        let root = Node::root(sample_page(&args.document));
        write_document(&mut RealFileSystem, &document_path, &root)?;
        println!("  {} Created {}", "✓".green(), args.document);
    }

    let config = Config {
        document: args.document.clone(),
        ..Config::default()
    };

    // Write config file
    let config_json = serde_json::to_string_pretty(&config)?;
    fs::write(&config_path, config_json)?;

    println!("  {} Created {}", "✓".green(), DEFAULT_CONFIG_NAME);
    println!();
    println!("{}", "✅ Project initialized!".green().bold());
    println!();
    println!("Next steps:");
    println!("  1. Run: pagesmith inspect {}", args.document);
    println!("  2. Write an ops.json and run: pagesmith apply {} ops.json", args.document);

    Ok(())
}

/// A hero section and a two-column feature row with ids seeded from the
/// document name
fn sample_page(document: &str) -> Vec<Node> {
    let mut ids = IdGenerator::new(document);

    let heading = Node::new(ids.new_id(), NodeType::Heading)
        .with_name("Title")
        .with_styles(Overrides {
            base: [("font-size".to_string(), "48px".to_string())].into(),
            mobile: [("font-size".to_string(), "28px".to_string())].into(),
            ..Overrides::default()
        })
        .with_content(Overrides {
            base: [("text".to_string(), "Welcome to our store".to_string())].into(),
            mobile: [("text".to_string(), "Welcome".to_string())].into(),
            ..Overrides::default()
        });

    let cta = Node::new(ids.new_id(), NodeType::Button)
        .with_name("Shop now")
        .with_content(Overrides::with_base([("text", "Shop now"), ("href", "/shop")]));

    let hero = Node::new(ids.new_id(), NodeType::Container)
        .with_name("Hero")
        .with_styles(Overrides::with_base([("padding", "64px")]))
        .with_child(heading)
        .with_child(cta);

    let mut row = Node::new(ids.new_id(), NodeType::Grid)
        .with_name("Features")
        .with_layout(Layout::Horizontal);
    for label in ["Fast shipping", "Easy returns"] {
        let text = Node::new(ids.new_id(), NodeType::Text)
            .with_name(label)
            .with_content(Overrides::with_base([("text", label)]));
        row = row.with_child(
            Node::new(ids.new_id(), NodeType::Column)
                .with_name("Column")
                .with_child(text),
        );
    }

    vec![hero, row]
}
