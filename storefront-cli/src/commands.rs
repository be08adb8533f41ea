//! CLI command implementations

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use clap::Subcommand;
use storefront_core::product::{
    load_products_from_json, preview, price_label, save_products_to_json, tags_label,
};
use storefront_core::{
    ChatMessage, DescriptionLength, ProductAuthor, ProductDraft, Result, RuntimeMode,
    StorefrontConfig, StorefrontError, Tone,
};
use storefront_search::{ScoredProduct, SearchField, SearchStrategy};
use storefront_web::ServiceStack;

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Start the web server
    Server {
        /// Host to bind to
        #[arg(long)]
        host: Option<String>,
        /// Port to bind to
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// List catalog products
    Products {
        /// Maximum number of products
        #[arg(short, long)]
        top: Option<usize>,
    },
    /// Search the catalog
    Search {
        /// Search text
        query: String,
        /// Search strategy: keyword, vector or hybrid
        #[arg(short, long, default_value = "hybrid")]
        strategy: SearchStrategy,
        /// Restrict the search to a field (repeatable)
        #[arg(short, long = "field")]
        fields: Vec<SearchField>,
        /// Maximum number of results
        #[arg(short, long)]
        top: Option<usize>,
        /// Print results as JSON
        #[arg(long)]
        json: bool,
    },
    /// Ask the shopping assistant a single question
    Chat {
        /// Message for the assistant
        message: String,
    },
    /// Upload products from a JSON file to the search index
    Upload {
        /// JSON array of products
        file: PathBuf,
        /// Compute missing description vectors before uploading
        #[arg(long)]
        embed: bool,
    },
    /// Generate a product description
    Describe {
        /// JSON file with a product draft
        #[arg(long)]
        draft: Option<PathBuf>,
        /// Product name
        #[arg(long)]
        name: Option<String>,
        /// Product category
        #[arg(long)]
        category: Option<String>,
        /// Attribute as key=value (repeatable)
        #[arg(short, long = "attribute", value_parser = parse_attribute)]
        attributes: Vec<(String, String)>,
        /// Product feature (repeatable)
        #[arg(short, long = "feature")]
        features: Vec<String>,
        /// Description length
        #[arg(long, value_enum, default_value = "medium")]
        length: DescriptionLength,
        /// Writing tone
        #[arg(long, value_enum, default_value = "professional")]
        tone: Tone,
    },
    /// Compute description vectors for a product file
    Embed {
        /// JSON array of products
        input: PathBuf,
        /// Output file, defaults to overwriting the input
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Handle the CLI command
///
/// # Errors
/// Returns appropriate error based on the command that fails
pub async fn handle_command(command: Commands, mode: RuntimeMode) -> Result<()> {
    let config = StorefrontConfig::from_env();
    tracing::debug!("Running command in {} mode", mode);

    match command {
        Commands::Server { host, port } => start_server(config, mode, host, port).await,
        Commands::Products { top } => list_products(&config, mode, top).await,
        Commands::Search {
            query,
            strategy,
            fields,
            top,
            json,
        } => search_products(&config, mode, &query, strategy, &fields, top, json).await,
        Commands::Chat { message } => ask_assistant(&config, mode, &message).await,
        Commands::Upload { file, embed } => upload_products(&config, mode, &file, embed).await,
        Commands::Describe {
            draft,
            name,
            category,
            attributes,
            features,
            length,
            tone,
        } => {
            let mut draft = match draft {
                Some(path) => read_draft(&path).await?,
                None => ProductDraft::default(),
            };
            if name.is_some() {
                draft.name = name;
            }
            if category.is_some() {
                draft.category = category;
            }
            draft.attributes.extend(attributes);
            draft.features.extend(features);
            describe_product(&config, mode, &draft, length, tone).await
        }
        Commands::Embed { input, output } => {
            let output = output.unwrap_or_else(|| input.clone());
            embed_products(&config, mode, &input, &output).await
        }
    }
}

/// Start the web server
///
/// # Errors
/// - `StorefrontError::Configuration` - Invalid bind address or missing production settings
/// - `StorefrontError::WebUI` - Server failed to start
pub async fn start_server(
    mut config: StorefrontConfig,
    mode: RuntimeMode,
    host: Option<String>,
    port: Option<u16>,
) -> Result<()> {
    let current = config.web.bind_address;
    let host = host.unwrap_or_else(|| current.ip().to_string());
    let port = port.unwrap_or(current.port());
    config.web.bind_address = format!("{host}:{port}")
        .parse::<SocketAddr>()
        .map_err(|e| StorefrontError::Configuration {
            reason: format!("Invalid bind address {host}:{port}: {e}"),
        })?;

    println!("Starting Storefront in {mode} mode ({})", mode.backends());
    storefront_web::run_server(config, mode).await
}

/// List catalog products
///
/// # Errors
/// - `StorefrontError::Search` - Index query failed
pub async fn list_products(
    config: &StorefrontConfig,
    mode: RuntimeMode,
    top: Option<usize>,
) -> Result<()> {
    let stack = ServiceStack::from_mode(config, mode)?;
    let products = stack
        .search
        .get_all_products(top)
        .await
        .map_err(StorefrontError::from_search_error)?;

    println!("{} products", products.len());
    print_results(&products, false);
    Ok(())
}

/// Search the catalog and print the results
///
/// # Errors
/// - `StorefrontError::Search` - Blank query or index query failed
/// - `StorefrontError::Json` - JSON output could not be serialized
pub async fn search_products(
    config: &StorefrontConfig,
    mode: RuntimeMode,
    query: &str,
    strategy: SearchStrategy,
    fields: &[SearchField],
    top: Option<usize>,
    json: bool,
) -> Result<()> {
    let stack = ServiceStack::from_mode(config, mode)?;
    let results = stack
        .search
        .search(strategy, query, fields, top)
        .await
        .map_err(StorefrontError::from_search_error)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&results)?);
        return Ok(());
    }

    if results.is_empty() {
        println!("No search results for '{query}'");
        return Ok(());
    }

    println!(
        "{}: {} results for '{}'",
        strategy.label(),
        results.len(),
        query
    );
    print_results(&results, true);
    Ok(())
}

/// Ask the shopping assistant one question
///
/// # Errors
/// - `StorefrontError::Search` - Product lookup or chat completion failed
pub async fn ask_assistant(config: &StorefrontConfig, mode: RuntimeMode, message: &str) -> Result<()> {
    let stack = ServiceStack::from_mode(config, mode)?;
    let reply = stack
        .assistant
        .respond(&[ChatMessage::user(message)])
        .await
        .map_err(StorefrontError::from_search_error)?;

    if let Some(hit) = &reply.product {
        println!(
            "Recommended: {} ({}, {})",
            hit.product.display_name(),
            hit.product.display_brand(),
            price_label(hit.product.price)
        );
        println!();
    }
    println!("{}", reply.content);
    Ok(())
}

/// Upload products from a JSON file
///
/// # Errors
/// - `StorefrontError::Catalog` - File is not a product array
/// - `StorefrontError::Model` - Embedding failed
/// - `StorefrontError::Search` - Index rejected the upload
pub async fn upload_products(
    config: &StorefrontConfig,
    mode: RuntimeMode,
    file: &Path,
    embed: bool,
) -> Result<()> {
    let mut products = load_products_from_json(file).await?;
    if products.is_empty() {
        println!("No products found in {}", file.display());
        return Ok(());
    }

    let stack = ServiceStack::from_mode(config, mode)?;
    if embed {
        let author = ProductAuthor::new(stack.search.model());
        for product in products
            .iter_mut()
            .filter(|p| p.description_vector.is_none())
        {
            author.embed_product(product).await?;
        }
    }

    let uploaded = stack
        .search
        .upload_products(&products)
        .await
        .map_err(StorefrontError::from_search_error)?;

    println!("Uploaded {}/{} products", uploaded, products.len());
    Ok(())
}

/// Generate a product description
///
/// # Errors
/// - `StorefrontError::Model` - Chat completion failed
pub async fn describe_product(
    config: &StorefrontConfig,
    mode: RuntimeMode,
    draft: &ProductDraft,
    length: DescriptionLength,
    tone: Tone,
) -> Result<()> {
    let stack = ServiceStack::from_mode(config, mode)?;
    let author = ProductAuthor::new(stack.search.model());
    let description = author.generate_description(draft, length, tone).await?;

    println!("{description}");
    Ok(())
}

/// Compute description vectors and write the products back out
///
/// # Errors
/// - `StorefrontError::Catalog` - Input is not a product array
/// - `StorefrontError::Model` - Embedding failed
/// - `StorefrontError::Io` - Output could not be written
pub async fn embed_products(
    config: &StorefrontConfig,
    mode: RuntimeMode,
    input: &Path,
    output: &Path,
) -> Result<()> {
    let mut products = load_products_from_json(input).await?;
    let stack = ServiceStack::from_mode(config, mode)?;
    let author = ProductAuthor::new(stack.search.model());

    for product in &mut products {
        author.embed_product(product).await?;
    }

    save_products_to_json(output, &products).await?;
    println!(
        "Embedded {} products into {}",
        products.len(),
        output.display()
    );
    Ok(())
}

async fn read_draft(path: &Path) -> Result<ProductDraft> {
    let raw = tokio::fs::read_to_string(path).await?;
    serde_json::from_str(&raw).map_err(|e| StorefrontError::Catalog {
        reason: format!("{}: {e}", path.display()),
    })
}

fn parse_attribute(raw: &str) -> std::result::Result<(String, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got '{raw}'"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("attribute key is empty in '{raw}'"));
    }
    Ok((key.to_lowercase(), value.trim().to_string()))
}

fn print_results(results: &[ScoredProduct], show_scores: bool) {
    for (position, hit) in results.iter().enumerate() {
        let product = &hit.product;
        print!(
            "{:>3}. {} | {} | {}",
            position + 1,
            product.display_name(),
            product.display_brand(),
            price_label(product.price)
        );
        if show_scores {
            print!(" | score {}", hit.score_label());
        }
        println!();

        if let Some(description) = product.description.as_deref().filter(|d| !d.is_empty()) {
            println!("     {}", preview(description, 80));
        }
        let tags = tags_label(&product.image_tags);
        if !tags.is_empty() {
            println!("     {tags}");
        }
    }
}
