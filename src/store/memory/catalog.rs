use async_trait::async_trait;

use super::{MemoryStore, check, optional_reference, reference};
use crate::{
    models::{
        BrandChanges, BrandEntity, CategoryChanges, CategoryEntity, NewBrand, NewCategory,
        NewProduct, NewProductVariant, ProductChanges, ProductEntity, ProductFilter,
        ProductVariantChanges, ProductVariantEntity,
    },
    store::{
        BrandRepository, CategoryRepository, ProductRepository, ProductVariantRepository,
        StoreResult,
    },
};

#[async_trait]
impl CategoryRepository for MemoryStore {
    async fn list_categories(&self) -> StoreResult<Vec<CategoryEntity>> {
        Ok(self.lock()?.categories.all())
    }

    async fn get_category(&self, category_id: i32) -> StoreResult<Option<CategoryEntity>> {
        Ok(self.lock()?.categories.get(category_id).cloned())
    }

    async fn create_category(&self, category: NewCategory) -> StoreResult<i32> {
        let mut guard = self.lock()?;
        let tables = &mut *guard;
        optional_reference(
            category.parent_category_id,
            |id| tables.categories.contains(id),
            "categories_parent_category_id_fkey",
        )?;
        tables.admin_ref(category.admin_id, "categories_admin_id_fkey")?;

        Ok(tables.categories.insert(|category_id| CategoryEntity {
            category_id,
            category_name: category.category_name,
            description: category.description,
            parent_category_id: category.parent_category_id,
            admin_id: category.admin_id,
        }))
    }

    async fn update_category(
        &self,
        category_id: i32,
        changes: CategoryChanges,
    ) -> StoreResult<usize> {
        let mut guard = self.lock()?;
        let tables = &mut *guard;
        optional_reference(
            changes.parent_category_id,
            |id| tables.categories.contains(id),
            "categories_parent_category_id_fkey",
        )?;
        tables.admin_ref(changes.admin_id, "categories_admin_id_fkey")?;

        let Some(category) = tables.categories.get_mut(category_id) else {
            return Ok(0);
        };
        if let Some(v) = changes.category_name {
            category.category_name = v;
        }
        if let Some(v) = changes.description {
            category.description = Some(v);
        }
        if let Some(v) = changes.parent_category_id {
            category.parent_category_id = Some(v);
        }
        if let Some(v) = changes.admin_id {
            category.admin_id = Some(v);
        }
        Ok(1)
    }

    async fn delete_category(&self, category_id: i32) -> StoreResult<usize> {
        Ok(self.lock()?.delete_category(category_id))
    }
}

#[async_trait]
impl BrandRepository for MemoryStore {
    async fn list_brands(&self) -> StoreResult<Vec<BrandEntity>> {
        Ok(self.lock()?.brands.all())
    }

    async fn get_brand(&self, brand_id: i32) -> StoreResult<Option<BrandEntity>> {
        Ok(self.lock()?.brands.get(brand_id).cloned())
    }

    async fn create_brand(&self, brand: NewBrand) -> StoreResult<i32> {
        let mut tables = self.lock()?;
        tables.admin_ref(brand.admin_id, "brands_admin_id_fkey")?;

        Ok(tables.brands.insert(|brand_id| BrandEntity {
            brand_id,
            brand_name: brand.brand_name,
            description: brand.description,
            admin_id: brand.admin_id,
        }))
    }

    async fn update_brand(&self, brand_id: i32, changes: BrandChanges) -> StoreResult<usize> {
        let mut tables = self.lock()?;
        tables.admin_ref(changes.admin_id, "brands_admin_id_fkey")?;

        let Some(brand) = tables.brands.get_mut(brand_id) else {
            return Ok(0);
        };
        if let Some(v) = changes.brand_name {
            brand.brand_name = v;
        }
        if let Some(v) = changes.description {
            brand.description = Some(v);
        }
        if let Some(v) = changes.admin_id {
            brand.admin_id = Some(v);
        }
        Ok(1)
    }

    async fn delete_brand(&self, brand_id: i32) -> StoreResult<usize> {
        Ok(self.lock()?.delete_brand(brand_id))
    }
}

fn product_checks(price: f64, stock_quantity: i32) -> StoreResult<()> {
    check(price >= 0.0, "products_price_check")?;
    check(stock_quantity >= 0, "products_stock_quantity_check")
}

#[async_trait]
impl ProductRepository for MemoryStore {
    async fn list_products(&self, filter: ProductFilter) -> StoreResult<Vec<ProductEntity>> {
        let tables = self.lock()?;
        Ok(tables
            .products
            .values()
            .filter(|p| filter.category_id.is_none_or(|id| p.category_id == Some(id)))
            .filter(|p| filter.brand_id.is_none_or(|id| p.brand_id == Some(id)))
            .filter(|p| filter.status.is_none_or(|status| p.status == status))
            .cloned()
            .collect())
    }

    async fn get_product(&self, product_id: i32) -> StoreResult<Option<ProductEntity>> {
        Ok(self.lock()?.products.get(product_id).cloned())
    }

    async fn create_product(&self, product: NewProduct) -> StoreResult<i32> {
        let mut guard = self.lock()?;
        let tables = &mut *guard;
        product_checks(product.price, product.stock_quantity)?;
        optional_reference(
            product.category_id,
            |id| tables.categories.contains(id),
            "products_category_id_fkey",
        )?;
        optional_reference(
            product.brand_id,
            |id| tables.brands.contains(id),
            "products_brand_id_fkey",
        )?;
        tables.admin_ref(product.admin_id, "products_admin_id_fkey")?;

        Ok(tables.products.insert(|product_id| ProductEntity {
            product_id,
            product_name: product.product_name,
            description: product.description,
            price: product.price,
            stock_quantity: product.stock_quantity,
            status: product.status,
            category_id: product.category_id,
            brand_id: product.brand_id,
            admin_id: product.admin_id,
            image_url: product.image_url,
        }))
    }

    async fn update_product(
        &self,
        product_id: i32,
        changes: ProductChanges,
    ) -> StoreResult<usize> {
        let mut guard = self.lock()?;
        let tables = &mut *guard;
        product_checks(
            changes.price.unwrap_or(0.0),
            changes.stock_quantity.unwrap_or(0),
        )?;
        optional_reference(
            changes.category_id,
            |id| tables.categories.contains(id),
            "products_category_id_fkey",
        )?;
        optional_reference(
            changes.brand_id,
            |id| tables.brands.contains(id),
            "products_brand_id_fkey",
        )?;
        tables.admin_ref(changes.admin_id, "products_admin_id_fkey")?;

        let Some(product) = tables.products.get_mut(product_id) else {
            return Ok(0);
        };
        if let Some(v) = changes.product_name {
            product.product_name = v;
        }
        if let Some(v) = changes.description {
            product.description = Some(v);
        }
        if let Some(v) = changes.price {
            product.price = v;
        }
        if let Some(v) = changes.stock_quantity {
            product.stock_quantity = v;
        }
        if let Some(v) = changes.status {
            product.status = v;
        }
        if let Some(v) = changes.category_id {
            product.category_id = Some(v);
        }
        if let Some(v) = changes.brand_id {
            product.brand_id = Some(v);
        }
        if let Some(v) = changes.admin_id {
            product.admin_id = Some(v);
        }
        if let Some(v) = changes.image_url {
            product.image_url = Some(v);
        }
        Ok(1)
    }

    async fn delete_product(&self, product_id: i32) -> StoreResult<usize> {
        Ok(self.lock()?.delete_product(product_id))
    }
}

fn variant_checks(price: f64, stock_quantity: i32) -> StoreResult<()> {
    check(price >= 0.0, "product_variants_price_check")?;
    check(stock_quantity >= 0, "product_variants_stock_quantity_check")
}

#[async_trait]
impl ProductVariantRepository for MemoryStore {
    async fn list_variants_by_product(
        &self,
        product_id: i32,
    ) -> StoreResult<Vec<ProductVariantEntity>> {
        let tables = self.lock()?;
        Ok(tables
            .product_variants
            .values()
            .filter(|v| v.product_id == product_id)
            .cloned()
            .collect())
    }

    async fn get_variant(&self, variant_id: i32) -> StoreResult<Option<ProductVariantEntity>> {
        Ok(self.lock()?.product_variants.get(variant_id).cloned())
    }

    async fn create_variant(&self, variant: NewProductVariant) -> StoreResult<i32> {
        let mut tables = self.lock()?;
        variant_checks(variant.price, variant.stock_quantity)?;
        reference(
            tables.products.contains(variant.product_id),
            "product_variants_product_id_fkey",
        )?;
        tables.admin_ref(variant.admin_id, "product_variants_admin_id_fkey")?;

        Ok(tables.product_variants.insert(|variant_id| ProductVariantEntity {
            variant_id,
            product_id: variant.product_id,
            size: variant.size,
            color: variant.color,
            price: variant.price,
            stock_quantity: variant.stock_quantity,
            admin_id: variant.admin_id,
        }))
    }

    async fn update_variant(
        &self,
        variant_id: i32,
        changes: ProductVariantChanges,
    ) -> StoreResult<usize> {
        let mut tables = self.lock()?;
        variant_checks(
            changes.price.unwrap_or(0.0),
            changes.stock_quantity.unwrap_or(0),
        )?;
        tables.admin_ref(changes.admin_id, "product_variants_admin_id_fkey")?;

        let Some(variant) = tables.product_variants.get_mut(variant_id) else {
            return Ok(0);
        };
        if let Some(v) = changes.size {
            variant.size = v;
        }
        if let Some(v) = changes.color {
            variant.color = v;
        }
        if let Some(v) = changes.price {
            variant.price = v;
        }
        if let Some(v) = changes.stock_quantity {
            variant.stock_quantity = v;
        }
        if let Some(v) = changes.admin_id {
            variant.admin_id = Some(v);
        }
        Ok(1)
    }

    async fn delete_variant(&self, variant_id: i32) -> StoreResult<usize> {
        Ok(self.lock()?.delete_variant(variant_id))
    }
}
