use clap::Parser;
use graph_mapper::utils::{logger, validation::Validate};
use graph_mapper::{mappable, CliConfig, GraphMapper, MapperError};
use std::cell::RefCell;
use std::rc::Rc;

mappable! {
    #[derive(Debug, Default)]
    struct Category {
        id: i32,
        name: String,
    }
}

mappable! {
    #[derive(Debug, Default)]
    struct Product {
        id: i32,
        name: String,
        price: f64,
        category: Option<Rc<RefCell<Category>>>,
    }
}

mappable! {
    #[derive(Debug, Default)]
    struct CategoryDto {
        id: i32,
        name: String,
    }
}

mappable! {
    #[derive(Debug, Default)]
    struct ProductDto {
        id: i32,
        name: String,
        category: Option<Rc<RefCell<CategoryDto>>>,
    }
}

mappable! {
    #[derive(Debug, Default)]
    struct OrderItem {
        product_name: String,
        quantity: i32,
    }
}

mappable! {
    #[derive(Debug, Default)]
    struct Order {
        id: i32,
        customer_name: String,
        items: Vec<Rc<RefCell<OrderItem>>>,
    }
}

mappable! {
    #[derive(Debug, Default)]
    struct OrderItemDto {
        product_name: String,
        quantity: i32,
    }
}

mappable! {
    #[derive(Debug, Default)]
    struct OrderDto {
        id: i32,
        customer_name: String,
        items: Vec<Option<Rc<RefCell<OrderItemDto>>>>,
    }
}

fn product(id: i32, name: &str, price: f64) -> Product {
    Product {
        id,
        name: name.to_string(),
        price,
        category: None,
    }
}

async fn run_samples(mapper: &GraphMapper) -> Result<(), MapperError> {
    println!("1. Basic mapping...");
    let laptop = Product {
        category: Some(Rc::new(RefCell::new(Category {
            id: 10,
            name: "Electronics".to_string(),
        }))),
        ..product(1, "Laptop", 1200.50)
    };
    let dto: ProductDto = mapper.map(&laptop)?;
    let category_name = dto
        .category
        .as_ref()
        .map(|category| category.borrow().name.clone())
        .unwrap_or_default();
    println!("Product DTO: {}, {}", dto.name, category_name);
    println!();

    println!("2. Mapping collections...");
    let products = vec![product(1, "Laptop", 1200.50), product(2, "Phone", 800.00)];
    let dtos: Vec<ProductDto> = mapper.map_collection(Some(products.as_slice()))?;
    for dto in &dtos {
        println!("{} - {}", dto.id, dto.name);
    }
    println!();

    println!("3. Async mapping with custom logic...");
    let laptop = product(1, "Laptop", 1200.50);
    let dto: ProductDto = mapper
        .map_async_with(&laptop, |mut dto: ProductDto| async move {
            tokio::task::yield_now().await;
            dto.name = dto.name.to_uppercase();
            Ok::<_, MapperError>(dto)
        })
        .await?;
    println!("Async Product DTO: {}", dto.name);
    println!();

    println!("4. Mapping nested collections...");
    let order = Order {
        id: 100,
        customer_name: "John Doe".to_string(),
        items: vec![
            Rc::new(RefCell::new(OrderItem {
                product_name: "Laptop".to_string(),
                quantity: 1,
            })),
            Rc::new(RefCell::new(OrderItem {
                product_name: "Mouse".to_string(),
                quantity: 2,
            })),
        ],
    };
    let dto: OrderDto = mapper.map(&order)?;
    println!("Order DTO {}: {}", dto.id, dto.customer_name);
    for item in dto.items.iter().flatten() {
        let item = item.borrow();
        println!("{} - {}", item.product_name, item.quantity);
    }

    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    if cli.json_logs {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting graph-mapper samples");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    if let Err(e) = cli.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        std::process::exit(1);
    }

    let config = match cli.mapper_config() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("❌ Could not load mapper configuration: {}", e);
            tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
            std::process::exit(1);
        }
    };
    tracing::debug!("Mapper config: {}", serde_json::to_string(&config)?);

    let mapper = GraphMapper::with_config(config);

    if let Err(e) = run_samples(&mapper).await {
        tracing::error!(
            "❌ Mapping failed: {} (Category: {:?})",
            e,
            e.category()
        );
        tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e);
        std::process::exit(2);
    }

    tracing::info!("✅ All samples completed");
    Ok(())
}
