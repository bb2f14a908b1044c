use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    sqlx, ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DatabaseConnection, DbErr,
    EntityTrait, IsolationLevel, PaginatorTrait, QueryFilter, QueryOrder, RuntimeErr, Set,
    TransactionTrait,
};
use uuid::Uuid;

use super::{BookingRepository, NewBooking, NewUser, ParkingSpotRepository, UserRepository};
use crate::entities::{booking, parking_spot, user};
use crate::error::{AppError, AppResult};
use crate::utils::date_range::DateRange;

const SERIALIZATION_FAILURE: &str = "40001";

#[derive(Clone)]
pub struct SeaOrmRepository {
    db: DatabaseConnection,
}

impl SeaOrmRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

async fn find_overlap<C: ConnectionTrait>(
    conn: &C,
    parking_spot_id: Uuid,
    range: DateRange,
    exclude: Option<Uuid>,
) -> Result<Option<booking::Model>, DbErr> {
    let (start, end) = (range.start_fixed(), range.end_fixed());

    let mut query = booking::Entity::find()
        .filter(booking::Column::ParkingSpotId.eq(parking_spot_id))
        .filter(
            Condition::any()
                .add(booking::Column::StartDate.between(start, end))
                .add(booking::Column::EndDate.between(start, end)),
        );

    if let Some(id) = exclude {
        query = query.filter(booking::Column::Id.ne(id));
    }

    query.one(conn).await
}

/// Maps errors raised inside a serializable write transaction.
fn write_error(err: DbErr) -> AppError {
    let runtime = match &err {
        DbErr::Exec(e) | DbErr::Query(e) | DbErr::Conn(e) => Some(e),
        _ => None,
    };

    if let Some(RuntimeErr::SqlxError(sqlx::Error::Database(db_err))) = runtime {
        if db_err.code().as_deref() == Some(SERIALIZATION_FAILURE) {
            return AppError::Conflict(
                "The parking spot was modified concurrently, please retry".to_string(),
            );
        }
    }

    AppError::Database(err)
}

#[async_trait]
impl UserRepository for SeaOrmRepository {
    async fn find_by_token(&self, token: &str) -> AppResult<Option<user::Model>> {
        Ok(user::Entity::find()
            .filter(user::Column::Token.eq(token))
            .one(&self.db)
            .await?)
    }

    async fn count_users(&self) -> AppResult<u64> {
        Ok(user::Entity::find().count(&self.db).await?)
    }

    async fn insert_users(&self, users: Vec<NewUser>) -> AppResult<()> {
        if users.is_empty() {
            return Ok(());
        }

        let models = users.into_iter().map(|u| user::ActiveModel {
            id: Set(Uuid::new_v4()),
            first_name: Set(u.first_name),
            last_name: Set(u.last_name),
            email: Set(u.email),
            roles: Set(u.roles),
            token: Set(u.token),
            ..Default::default()
        });

        user::Entity::insert_many(models).exec(&self.db).await?;
        Ok(())
    }
}

#[async_trait]
impl ParkingSpotRepository for SeaOrmRepository {
    async fn list_spots(&self) -> AppResult<Vec<parking_spot::Model>> {
        Ok(parking_spot::Entity::find()
            .order_by_asc(parking_spot::Column::CreatedAt)
            .order_by_asc(parking_spot::Column::Name)
            .all(&self.db)
            .await?)
    }

    async fn find_spot(&self, id: Uuid) -> AppResult<Option<parking_spot::Model>> {
        Ok(parking_spot::Entity::find_by_id(id).one(&self.db).await?)
    }

    async fn count_spots(&self) -> AppResult<u64> {
        Ok(parking_spot::Entity::find().count(&self.db).await?)
    }

    async fn insert_spots(&self, names: Vec<String>) -> AppResult<()> {
        if names.is_empty() {
            return Ok(());
        }

        let models = names.into_iter().map(|name| parking_spot::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name),
            ..Default::default()
        });

        parking_spot::Entity::insert_many(models).exec(&self.db).await?;
        Ok(())
    }
}

#[async_trait]
impl BookingRepository for SeaOrmRepository {
    async fn list_by_spot(&self, parking_spot_id: Uuid) -> AppResult<Vec<booking::Model>> {
        Ok(booking::Entity::find()
            .filter(booking::Column::ParkingSpotId.eq(parking_spot_id))
            .order_by_asc(booking::Column::StartDate)
            .all(&self.db)
            .await?)
    }

    async fn find_booking(&self, id: Uuid) -> AppResult<Option<booking::Model>> {
        Ok(booking::Entity::find_by_id(id).one(&self.db).await?)
    }

    async fn find_one_in_date_range(
        &self,
        parking_spot_id: Uuid,
        range: DateRange,
        exclude: Option<Uuid>,
    ) -> AppResult<Option<booking::Model>> {
        Ok(find_overlap(&self.db, parking_spot_id, range, exclude).await?)
    }

    async fn insert_booking(&self, new: NewBooking) -> AppResult<booking::Model> {
        let txn = self
            .db
            .begin_with_config(Some(IsolationLevel::Serializable), None)
            .await?;

        // Re-checked inside the transaction so two concurrent writers cannot
        // both pass the caller's earlier check.
        if find_overlap(&txn, new.parking_spot_id, new.range, None)
            .await
            .map_err(write_error)?
            .is_some()
        {
            return Err(AppError::OverlappingBooking);
        }

        let now = Utc::now().into();
        let model = booking::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(new.user_id),
            parking_spot_id: Set(new.parking_spot_id),
            start_date: Set(new.range.start_fixed()),
            end_date: Set(new.range.end_fixed()),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await
        .map_err(write_error)?;

        txn.commit().await.map_err(write_error)?;
        Ok(model)
    }

    async fn update_booking_range(
        &self,
        id: Uuid,
        parking_spot_id: Uuid,
        range: DateRange,
    ) -> AppResult<booking::Model> {
        let txn = self
            .db
            .begin_with_config(Some(IsolationLevel::Serializable), None)
            .await?;

        if find_overlap(&txn, parking_spot_id, range, Some(id))
            .await
            .map_err(write_error)?
            .is_some()
        {
            return Err(AppError::OverlappingBooking);
        }

        let active = booking::ActiveModel {
            id: Set(id),
            start_date: Set(range.start_fixed()),
            end_date: Set(range.end_fixed()),
            ..Default::default()
        };

        let model = match active.update(&txn).await {
            Ok(model) => model,
            Err(DbErr::RecordNotUpdated) => return Err(AppError::not_found("bookingId")),
            Err(e) => return Err(write_error(e)),
        };

        txn.commit().await.map_err(write_error)?;
        Ok(model)
    }

    async fn delete_booking(&self, id: Uuid) -> AppResult<()> {
        let result = booking::Entity::delete_by_id(id).exec(&self.db).await?;

        if result.rows_affected == 0 {
            return Err(AppError::not_found("bookingId"));
        }

        Ok(())
    }
}
