use async_trait::async_trait;
use chrono::Utc;
use diesel::{ExpressionMethods, OptionalExtension, QueryDsl, SelectableHelper};
use diesel_async::RunQueryDsl;

use super::PgStore;
use crate::{
    models::{
        AdminChanges, AdminCredentials, AdminEntity, NewAdmin, NewUser, UserChanges,
        UserCredentials, UserEntity,
    },
    schema::{admins, users},
    store::{AdminRepository, StoreResult, UserRepository},
};

#[async_trait]
impl UserRepository for PgStore {
    async fn list_users(&self) -> StoreResult<Vec<UserEntity>> {
        let conn = &mut self.conn().await?;

        let users = users::table
            .select(UserEntity::as_select())
            .order(users::user_id.asc())
            .load(conn)
            .await?;
        Ok(users)
    }

    async fn get_user(&self, user_id: i32) -> StoreResult<Option<UserEntity>> {
        let conn = &mut self.conn().await?;

        let user = users::table
            .find(user_id)
            .select(UserEntity::as_select())
            .first(conn)
            .await
            .optional()?;
        Ok(user)
    }

    async fn find_user_credentials(&self, email: &str) -> StoreResult<Option<UserCredentials>> {
        let conn = &mut self.conn().await?;

        let credentials = users::table
            .filter(users::email.eq(email))
            .select(UserCredentials::as_select())
            .first(conn)
            .await
            .optional()?;
        Ok(credentials)
    }

    async fn create_user(&self, user: NewUser) -> StoreResult<i32> {
        let conn = &mut self.conn().await?;

        let user_id = diesel::insert_into(users::table)
            .values(&user)
            .returning(users::user_id)
            .get_result(conn)
            .await?;
        Ok(user_id)
    }

    async fn update_user(&self, user_id: i32, changes: UserChanges) -> StoreResult<usize> {
        let conn = &mut self.conn().await?;

        let updated = diesel::update(users::table.find(user_id))
            .set(&changes)
            .execute(conn)
            .await?;
        Ok(updated)
    }

    async fn touch_user_login(&self, user_id: i32) -> StoreResult<usize> {
        let conn = &mut self.conn().await?;

        let updated = diesel::update(users::table.find(user_id))
            .set(users::last_login.eq(Some(Utc::now())))
            .execute(conn)
            .await?;
        Ok(updated)
    }

    async fn delete_user(&self, user_id: i32) -> StoreResult<usize> {
        let conn = &mut self.conn().await?;

        let deleted = diesel::delete(users::table.find(user_id))
            .execute(conn)
            .await?;
        Ok(deleted)
    }
}

#[async_trait]
impl AdminRepository for PgStore {
    async fn list_admins(&self) -> StoreResult<Vec<AdminEntity>> {
        let conn = &mut self.conn().await?;

        let admins = admins::table
            .select(AdminEntity::as_select())
            .order(admins::admin_id.asc())
            .load(conn)
            .await?;
        Ok(admins)
    }

    async fn has_admins(&self) -> StoreResult<bool> {
        let conn = &mut self.conn().await?;

        let exists = diesel::select(diesel::dsl::exists(admins::table.select(admins::admin_id)))
            .get_result(conn)
            .await?;
        Ok(exists)
    }

    async fn get_admin(&self, admin_id: i32) -> StoreResult<Option<AdminEntity>> {
        let conn = &mut self.conn().await?;

        let admin = admins::table
            .find(admin_id)
            .select(AdminEntity::as_select())
            .first(conn)
            .await
            .optional()?;
        Ok(admin)
    }

    async fn find_admin_credentials(
        &self,
        email: &str,
    ) -> StoreResult<Option<AdminCredentials>> {
        let conn = &mut self.conn().await?;

        let credentials = admins::table
            .filter(admins::email.eq(email))
            .select(AdminCredentials::as_select())
            .first(conn)
            .await
            .optional()?;
        Ok(credentials)
    }

    async fn get_admin_password_hash(&self, admin_id: i32) -> StoreResult<Option<String>> {
        let conn = &mut self.conn().await?;

        let hash = admins::table
            .find(admin_id)
            .select(admins::password_hash)
            .first(conn)
            .await
            .optional()?;
        Ok(hash)
    }

    async fn create_admin(&self, admin: NewAdmin) -> StoreResult<i32> {
        let conn = &mut self.conn().await?;

        let admin_id = diesel::insert_into(admins::table)
            .values(&admin)
            .returning(admins::admin_id)
            .get_result(conn)
            .await?;
        Ok(admin_id)
    }

    async fn update_admin(&self, admin_id: i32, changes: AdminChanges) -> StoreResult<usize> {
        let conn = &mut self.conn().await?;

        let updated = diesel::update(admins::table.find(admin_id))
            .set(&changes)
            .execute(conn)
            .await?;
        Ok(updated)
    }

    async fn set_admin_password(
        &self,
        admin_id: i32,
        password_hash: String,
    ) -> StoreResult<usize> {
        let conn = &mut self.conn().await?;

        let updated = diesel::update(admins::table.find(admin_id))
            .set(admins::password_hash.eq(password_hash))
            .execute(conn)
            .await?;
        Ok(updated)
    }

    async fn delete_admin(&self, admin_id: i32) -> StoreResult<usize> {
        let conn = &mut self.conn().await?;

        let deleted = diesel::delete(admins::table.find(admin_id))
            .execute(conn)
            .await?;
        Ok(deleted)
    }
}
