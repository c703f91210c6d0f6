use async_trait::async_trait;
use diesel::{ExpressionMethods, OptionalExtension, QueryDsl, SelectableHelper};
use diesel_async::RunQueryDsl;

use super::PgStore;
use crate::{
    models::{
        BrandChanges, BrandEntity, CategoryChanges, CategoryEntity, NewBrand, NewCategory,
        NewProduct, NewProductVariant, ProductChanges, ProductEntity, ProductFilter,
        ProductVariantChanges, ProductVariantEntity,
    },
    schema::{brands, categories, product_variants, products},
    store::{
        BrandRepository, CategoryRepository, ProductRepository, ProductVariantRepository,
        StoreResult,
    },
};

#[async_trait]
impl CategoryRepository for PgStore {
    async fn list_categories(&self) -> StoreResult<Vec<CategoryEntity>> {
        let conn = &mut self.conn().await?;

        let categories = categories::table
            .select(CategoryEntity::as_select())
            .order(categories::category_id.asc())
            .load(conn)
            .await?;
        Ok(categories)
    }

    async fn get_category(&self, category_id: i32) -> StoreResult<Option<CategoryEntity>> {
        let conn = &mut self.conn().await?;

        let category = categories::table
            .find(category_id)
            .select(CategoryEntity::as_select())
            .first(conn)
            .await
            .optional()?;
        Ok(category)
    }

    async fn create_category(&self, category: NewCategory) -> StoreResult<i32> {
        let conn = &mut self.conn().await?;

        let category_id = diesel::insert_into(categories::table)
            .values(&category)
            .returning(categories::category_id)
            .get_result(conn)
            .await?;
        Ok(category_id)
    }

    async fn update_category(
        &self,
        category_id: i32,
        changes: CategoryChanges,
    ) -> StoreResult<usize> {
        let conn = &mut self.conn().await?;

        let updated = diesel::update(categories::table.find(category_id))
            .set(&changes)
            .execute(conn)
            .await?;
        Ok(updated)
    }

    async fn delete_category(&self, category_id: i32) -> StoreResult<usize> {
        let conn = &mut self.conn().await?;

        let deleted = diesel::delete(categories::table.find(category_id))
            .execute(conn)
            .await?;
        Ok(deleted)
    }
}

#[async_trait]
impl BrandRepository for PgStore {
    async fn list_brands(&self) -> StoreResult<Vec<BrandEntity>> {
        let conn = &mut self.conn().await?;

        let brands = brands::table
            .select(BrandEntity::as_select())
            .order(brands::brand_id.asc())
            .load(conn)
            .await?;
        Ok(brands)
    }

    async fn get_brand(&self, brand_id: i32) -> StoreResult<Option<BrandEntity>> {
        let conn = &mut self.conn().await?;

        let brand = brands::table
            .find(brand_id)
            .select(BrandEntity::as_select())
            .first(conn)
            .await
            .optional()?;
        Ok(brand)
    }

    async fn create_brand(&self, brand: NewBrand) -> StoreResult<i32> {
        let conn = &mut self.conn().await?;

        let brand_id = diesel::insert_into(brands::table)
            .values(&brand)
            .returning(brands::brand_id)
            .get_result(conn)
            .await?;
        Ok(brand_id)
    }

    async fn update_brand(&self, brand_id: i32, changes: BrandChanges) -> StoreResult<usize> {
        let conn = &mut self.conn().await?;

        let updated = diesel::update(brands::table.find(brand_id))
            .set(&changes)
            .execute(conn)
            .await?;
        Ok(updated)
    }

    async fn delete_brand(&self, brand_id: i32) -> StoreResult<usize> {
        let conn = &mut self.conn().await?;

        let deleted = diesel::delete(brands::table.find(brand_id))
            .execute(conn)
            .await?;
        Ok(deleted)
    }
}

#[async_trait]
impl ProductRepository for PgStore {
    async fn list_products(&self, filter: ProductFilter) -> StoreResult<Vec<ProductEntity>> {
        let conn = &mut self.conn().await?;

        let mut query = products::table
            .select(ProductEntity::as_select())
            .order(products::product_id.asc())
            .into_boxed();
        if let Some(category_id) = filter.category_id {
            query = query.filter(products::category_id.eq(category_id));
        }
        if let Some(brand_id) = filter.brand_id {
            query = query.filter(products::brand_id.eq(brand_id));
        }
        if let Some(status) = filter.status {
            query = query.filter(products::status.eq(status));
        }

        let products = query.load(conn).await?;
        Ok(products)
    }

    async fn get_product(&self, product_id: i32) -> StoreResult<Option<ProductEntity>> {
        let conn = &mut self.conn().await?;

        let product = products::table
            .find(product_id)
            .select(ProductEntity::as_select())
            .first(conn)
            .await
            .optional()?;
        Ok(product)
    }

    async fn create_product(&self, product: NewProduct) -> StoreResult<i32> {
        let conn = &mut self.conn().await?;

        let product_id = diesel::insert_into(products::table)
            .values(&product)
            .returning(products::product_id)
            .get_result(conn)
            .await?;
        Ok(product_id)
    }

    async fn update_product(
        &self,
        product_id: i32,
        changes: ProductChanges,
    ) -> StoreResult<usize> {
        let conn = &mut self.conn().await?;

        let updated = diesel::update(products::table.find(product_id))
            .set(&changes)
            .execute(conn)
            .await?;
        Ok(updated)
    }

    async fn delete_product(&self, product_id: i32) -> StoreResult<usize> {
        let conn = &mut self.conn().await?;

        let deleted = diesel::delete(products::table.find(product_id))
            .execute(conn)
            .await?;
        Ok(deleted)
    }
}

#[async_trait]
impl ProductVariantRepository for PgStore {
    async fn list_variants_by_product(
        &self,
        product_id: i32,
    ) -> StoreResult<Vec<ProductVariantEntity>> {
        let conn = &mut self.conn().await?;

        let variants = product_variants::table
            .filter(product_variants::product_id.eq(product_id))
            .select(ProductVariantEntity::as_select())
            .order(product_variants::variant_id.asc())
            .load(conn)
            .await?;
        Ok(variants)
    }

    async fn get_variant(&self, variant_id: i32) -> StoreResult<Option<ProductVariantEntity>> {
        let conn = &mut self.conn().await?;

        let variant = product_variants::table
            .find(variant_id)
            .select(ProductVariantEntity::as_select())
            .first(conn)
            .await
            .optional()?;
        Ok(variant)
    }

    async fn create_variant(&self, variant: NewProductVariant) -> StoreResult<i32> {
        let conn = &mut self.conn().await?;

        let variant_id = diesel::insert_into(product_variants::table)
            .values(&variant)
            .returning(product_variants::variant_id)
            .get_result(conn)
            .await?;
        Ok(variant_id)
    }

    async fn update_variant(
        &self,
        variant_id: i32,
        changes: ProductVariantChanges,
    ) -> StoreResult<usize> {
        let conn = &mut self.conn().await?;

        let updated = diesel::update(product_variants::table.find(variant_id))
            .set(&changes)
            .execute(conn)
            .await?;
        Ok(updated)
    }

    async fn delete_variant(&self, variant_id: i32) -> StoreResult<usize> {
        let conn = &mut self.conn().await?;

        let deleted = diesel::delete(product_variants::table.find(variant_id))
            .execute(conn)
            .await?;
        Ok(deleted)
    }
}
