use anyhow::Result;
use graph_mapper::{mappable, GraphMapper, MapperError};
use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

mappable! {
    #[derive(Debug, Default)]
    pub struct Product {
        pub id: i32,
        pub name: String,
    }
}

mappable! {
    #[derive(Debug, Default)]
    pub struct ProductDto {
        pub id: i32,
        pub name: String,
        pub lookup: Option<String>,
    }
}

fn products(count: i32) -> Vec<Product> {
    (1..=count)
        .map(|id| Product {
            id,
            name: format!("Item {}", id),
        })
        .collect()
}

async fn fake_lookup(id: i32) -> String {
    tokio::time::sleep(Duration::from_millis(5)).await;
    format!("sku-{:03}", id)
}

#[tokio::test]
async fn test_map_async_without_callback() -> Result<()> {
    let source = Product {
        id: 1,
        name: "Laptop".to_string(),
    };

    let dto: ProductDto = GraphMapper::new().map_async(&source).await?;

    assert_eq!(dto.id, 1);
    assert_eq!(dto.name, "Laptop");
    assert!(dto.lookup.is_none());
    Ok(())
}

#[tokio::test]
async fn test_map_async_callback_sees_copied_fields() -> Result<()> {
    let source = Product {
        id: 42,
        name: "Laptop".to_string(),
    };

    let dto: ProductDto = GraphMapper::new()
        .map_async_with(&source, |mut dto: ProductDto| async move {
            assert_eq!(dto.name, "Laptop");
            dto.lookup = Some(fake_lookup(dto.id).await);
            dto.name = dto.name.to_uppercase();
            Ok::<_, MapperError>(dto)
        })
        .await?;

    assert_eq!(dto.name, "LAPTOP");
    assert_eq!(dto.lookup.as_deref(), Some("sku-042"));
    Ok(())
}

#[tokio::test]
async fn test_map_async_rejects_absent_source() {
    let missing: Option<Product> = None;

    let err = GraphMapper::new()
        .map_async::<ProductDto, _>(&missing)
        .await
        .unwrap_err();

    assert!(matches!(err, MapperError::NullInput { .. }));
}

#[tokio::test]
async fn test_collection_async_keeps_input_order_under_variable_latency() -> Result<()> {
    let items = products(6);

    // Early elements sleep longest; output order must still follow input order.
    let dtos: Vec<ProductDto> = GraphMapper::new()
        .map_collection_async_with(Some(items.as_slice()), |mut dto: ProductDto| async move {
            let delay = (7 - dto.id) as u64 * 10;
            tokio::time::sleep(Duration::from_millis(delay)).await;
            dto.lookup = Some(format!("waited {}ms", delay));
            Ok::<_, MapperError>(dto)
        })
        .await?;

    let ids: Vec<i32> = dtos.iter().map(|dto| dto.id).collect();
    assert_eq!(ids, vec![1, 2, 3, 4, 5, 6]);
    assert_eq!(dtos[0].lookup.as_deref(), Some("waited 60ms"));
    assert_eq!(dtos[5].lookup.as_deref(), Some("waited 10ms"));
    Ok(())
}

#[tokio::test]
async fn test_collection_async_processes_one_element_at_a_time() -> Result<()> {
    let items = products(4);
    let in_flight = Rc::new(Cell::new(0usize));
    let peak = Rc::new(Cell::new(0usize));

    let dtos: Vec<ProductDto> = GraphMapper::new()
        .map_collection_async_with(Some(items.as_slice()), |dto: ProductDto| {
            let in_flight = in_flight.clone();
            let peak = peak.clone();
            async move {
                in_flight.set(in_flight.get() + 1);
                peak.set(peak.get().max(in_flight.get()));
                tokio::task::yield_now().await;
                tokio::time::sleep(Duration::from_millis(2)).await;
                in_flight.set(in_flight.get() - 1);
                Ok::<_, MapperError>(dto)
            }
        })
        .await?;

    assert_eq!(dtos.len(), 4);
    assert_eq!(peak.get(), 1);
    Ok(())
}

#[tokio::test]
async fn test_collection_async_callback_error_aborts() {
    let items = products(5);
    let calls = Rc::new(Cell::new(0usize));

    let result: Result<Vec<ProductDto>, MapperError> = GraphMapper::new()
        .map_collection_async_with(Some(items.as_slice()), |dto: ProductDto| {
            let calls = calls.clone();
            async move {
                calls.set(calls.get() + 1);
                if dto.id == 2 {
                    return Err(MapperError::custom("lookup service unavailable"));
                }
                Ok(dto)
            }
        })
        .await;

    let err = result.unwrap_err();
    assert!(matches!(err, MapperError::CustomMapping { .. }));
    assert_eq!(calls.get(), 2);
}

#[tokio::test]
async fn test_collection_async_without_callback() -> Result<()> {
    let items = products(3);

    let dtos: Vec<ProductDto> = GraphMapper::new()
        .map_collection_async(Some(items.as_slice()))
        .await?;

    assert_eq!(dtos.len(), 3);
    assert_eq!(dtos[2].name, "Item 3");

    let err = GraphMapper::new()
        .map_collection_async::<ProductDto, Product>(None)
        .await
        .unwrap_err();
    assert!(matches!(err, MapperError::NullInput { .. }));
    Ok(())
}

#[test]
fn test_map_async_on_blocking_executor() {
    let source = Product {
        id: 9,
        name: "Dock".to_string(),
    };
    let mapper = GraphMapper::new();

    let dto: ProductDto = tokio_test::block_on(mapper.map_async(&source)).unwrap();

    assert_eq!(dto.id, 9);
    assert_eq!(dto.name, "Dock");
}
