use async_trait::async_trait;
use chrono::Utc;

use super::{AdminRow, MemoryStore, UserRow, check, unique};
use crate::{
    models::{
        AdminChanges, AdminCredentials, AdminEntity, NewAdmin, NewUser, UserChanges,
        UserCredentials, UserEntity,
    },
    store::{AdminRepository, StoreResult, UserRepository},
    validation::PROVINCES,
};

fn province_check(province: &str) -> StoreResult<()> {
    check(PROVINCES.contains(&province), "users_province_check")
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn list_users(&self) -> StoreResult<Vec<UserEntity>> {
        let tables = self.lock()?;
        Ok(tables.users.values().map(|row| row.entity.clone()).collect())
    }

    async fn get_user(&self, user_id: i32) -> StoreResult<Option<UserEntity>> {
        let tables = self.lock()?;
        Ok(tables.users.get(user_id).map(|row| row.entity.clone()))
    }

    async fn find_user_credentials(&self, email: &str) -> StoreResult<Option<UserCredentials>> {
        let tables = self.lock()?;
        Ok(tables
            .users
            .values()
            .find(|row| row.entity.email == email)
            .map(|row| UserCredentials {
                user_id: row.entity.user_id,
                password_hash: row.password_hash.clone(),
            }))
    }

    async fn create_user(&self, user: NewUser) -> StoreResult<i32> {
        let mut tables = self.lock()?;
        unique(
            tables.users.values().any(|row| row.entity.email == user.email),
            "users_email_key",
        )?;
        province_check(&user.province)?;

        Ok(tables.users.insert(|user_id| UserRow {
            entity: UserEntity {
                user_id,
                first_name: user.first_name,
                last_name: user.last_name,
                email: user.email,
                phone_number1: user.phone_number1,
                phone_number2: user.phone_number2,
                date_created: Utc::now(),
                last_login: None,
                street_address: user.street_address,
                city: user.city,
                province: user.province,
                country: user.country,
                gmaplink: user.gmaplink,
            },
            password_hash: user.password_hash,
        }))
    }

    async fn update_user(&self, user_id: i32, changes: UserChanges) -> StoreResult<usize> {
        let mut tables = self.lock()?;
        if let Some(email) = &changes.email {
            unique(
                tables
                    .users
                    .values()
                    .any(|row| &row.entity.email == email && row.entity.user_id != user_id),
                "users_email_key",
            )?;
        }
        if let Some(province) = &changes.province {
            province_check(province)?;
        }

        let Some(row) = tables.users.get_mut(user_id) else {
            return Ok(0);
        };
        if let Some(v) = changes.password_hash {
            row.password_hash = v;
        }
        let user = &mut row.entity;
        if let Some(v) = changes.first_name {
            user.first_name = v;
        }
        if let Some(v) = changes.last_name {
            user.last_name = v;
        }
        if let Some(v) = changes.email {
            user.email = v;
        }
        if let Some(v) = changes.phone_number1 {
            user.phone_number1 = Some(v);
        }
        if let Some(v) = changes.phone_number2 {
            user.phone_number2 = Some(v);
        }
        if let Some(v) = changes.street_address {
            user.street_address = v;
        }
        if let Some(v) = changes.city {
            user.city = v;
        }
        if let Some(v) = changes.province {
            user.province = v;
        }
        if let Some(v) = changes.country {
            user.country = v;
        }
        if let Some(v) = changes.gmaplink {
            user.gmaplink = Some(v);
        }
        Ok(1)
    }

    async fn touch_user_login(&self, user_id: i32) -> StoreResult<usize> {
        let mut tables = self.lock()?;
        let Some(row) = tables.users.get_mut(user_id) else {
            return Ok(0);
        };
        row.entity.last_login = Some(Utc::now());
        Ok(1)
    }

    async fn delete_user(&self, user_id: i32) -> StoreResult<usize> {
        let mut tables = self.lock()?;
        Ok(tables.delete_user(user_id))
    }
}

#[async_trait]
impl AdminRepository for MemoryStore {
    async fn list_admins(&self) -> StoreResult<Vec<AdminEntity>> {
        let tables = self.lock()?;
        Ok(tables.admins.values().map(|row| row.entity.clone()).collect())
    }

    async fn has_admins(&self) -> StoreResult<bool> {
        Ok(self.lock()?.admins.values().next().is_some())
    }

    async fn get_admin(&self, admin_id: i32) -> StoreResult<Option<AdminEntity>> {
        let tables = self.lock()?;
        Ok(tables.admins.get(admin_id).map(|row| row.entity.clone()))
    }

    async fn find_admin_credentials(
        &self,
        email: &str,
    ) -> StoreResult<Option<AdminCredentials>> {
        let tables = self.lock()?;
        Ok(tables
            .admins
            .values()
            .find(|row| row.entity.email == email)
            .map(|row| AdminCredentials {
                admin_id: row.entity.admin_id,
                password_hash: row.password_hash.clone(),
            }))
    }

    async fn get_admin_password_hash(&self, admin_id: i32) -> StoreResult<Option<String>> {
        let tables = self.lock()?;
        Ok(tables
            .admins
            .get(admin_id)
            .map(|row| row.password_hash.clone()))
    }

    async fn create_admin(&self, admin: NewAdmin) -> StoreResult<i32> {
        let mut tables = self.lock()?;
        unique(
            tables.admins.values().any(|row| row.entity.email == admin.email),
            "admins_email_key",
        )?;

        Ok(tables.admins.insert(|admin_id| AdminRow {
            entity: AdminEntity {
                admin_id,
                first_name: admin.first_name,
                last_name: admin.last_name,
                email: admin.email,
            },
            password_hash: admin.password_hash,
        }))
    }

    async fn update_admin(&self, admin_id: i32, changes: AdminChanges) -> StoreResult<usize> {
        let mut tables = self.lock()?;
        if let Some(email) = &changes.email {
            unique(
                tables
                    .admins
                    .values()
                    .any(|row| &row.entity.email == email && row.entity.admin_id != admin_id),
                "admins_email_key",
            )?;
        }

        let Some(row) = tables.admins.get_mut(admin_id) else {
            return Ok(0);
        };
        if let Some(v) = changes.first_name {
            row.entity.first_name = v;
        }
        if let Some(v) = changes.last_name {
            row.entity.last_name = v;
        }
        if let Some(v) = changes.email {
            row.entity.email = v;
        }
        Ok(1)
    }

    async fn set_admin_password(
        &self,
        admin_id: i32,
        password_hash: String,
    ) -> StoreResult<usize> {
        let mut tables = self.lock()?;
        let Some(row) = tables.admins.get_mut(admin_id) else {
            return Ok(0);
        };
        row.password_hash = password_hash;
        Ok(1)
    }

    async fn delete_admin(&self, admin_id: i32) -> StoreResult<usize> {
        let mut tables = self.lock()?;
        Ok(tables.delete_admin(admin_id))
    }
}
