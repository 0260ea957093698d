use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250101_000001_create_nakliye_table::Migration),
            Box::new(m20250101_000002_create_yatan_tutar_table::Migration),
            Box::new(m20250101_000003_create_users_table::Migration),
            Box::new(m20250101_000004_create_biometric_credentials_table::Migration),
        ]
    }
}

// Migration implementations

mod m20250101_000001_create_nakliye_table {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250101_000001_create_nakliye_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(NakliyeKayitlari::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(NakliyeKayitlari::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(NakliyeKayitlari::Tarih)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(ColumnDef::new(NakliyeKayitlari::SiraNo).string().not_null())
                        .col(ColumnDef::new(NakliyeKayitlari::Kod).string().null())
                        .col(ColumnDef::new(NakliyeKayitlari::Musteri).string().not_null())
                        .col(
                            ColumnDef::new(NakliyeKayitlari::IrsaliyeNo)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(NakliyeKayitlari::Ithalat)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .col(
                            ColumnDef::new(NakliyeKayitlari::Ihracat)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .col(
                            ColumnDef::new(NakliyeKayitlari::Bos)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .col(
                            ColumnDef::new(NakliyeKayitlari::BosTasima)
                                .decimal()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(NakliyeKayitlari::Reefer)
                                .decimal()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(NakliyeKayitlari::Bekleme)
                                .decimal()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(NakliyeKayitlari::Geceleme)
                                .decimal()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(NakliyeKayitlari::Pazar)
                                .decimal()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(NakliyeKayitlari::Harcirah)
                                .decimal()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(NakliyeKayitlari::Toplam)
                                .decimal()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(NakliyeKayitlari::Sistem)
                                .decimal()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(NakliyeKayitlari::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_nakliye_tarih")
                        .table(NakliyeKayitlari::Table)
                        .col(NakliyeKayitlari::Tarih)
                        .to_owned(),
                )
                .await?;

            // Supports the import-time duplicate check on (sira_no, musteri, irsaliye_no).
            // Not unique: the original system only suppresses duplicates during backup import.
            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_nakliye_dup_key")
                        .table(NakliyeKayitlari::Table)
                        .col(NakliyeKayitlari::SiraNo)
                        .col(NakliyeKayitlari::Musteri)
                        .col(NakliyeKayitlari::IrsaliyeNo)
                        .to_owned(),
                )
                .await?;

            Ok(())
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(NakliyeKayitlari::Table).to_owned())
                .await
        }
    }

    #[derive(Iden)]
    enum NakliyeKayitlari {
        Table,
        Id,
        Tarih,
        SiraNo,
        Kod,
        Musteri,
        IrsaliyeNo,
        Ithalat,
        Ihracat,
        Bos,
        BosTasima,
        Reefer,
        Bekleme,
        Geceleme,
        Pazar,
        Harcirah,
        Toplam,
        Sistem,
        CreatedAt,
    }
}

mod m20250101_000002_create_yatan_tutar_table {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250101_000002_create_yatan_tutar_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(YatanTutarlar::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(YatanTutarlar::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(YatanTutarlar::Tutar)
                                .decimal()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(YatanTutarlar::YatisTarihi)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(YatanTutarlar::DonemBaslangic)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(YatanTutarlar::DonemBitis)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(ColumnDef::new(YatanTutarlar::Aciklama).string().null())
                        .col(
                            ColumnDef::new(YatanTutarlar::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_yatan_tutar_yatis_tarihi")
                        .table(YatanTutarlar::Table)
                        .col(YatanTutarlar::YatisTarihi)
                        .to_owned(),
                )
                .await?;

            Ok(())
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(YatanTutarlar::Table).to_owned())
                .await
        }
    }

    #[derive(Iden)]
    enum YatanTutarlar {
        Table,
        Id,
        Tutar,
        YatisTarihi,
        DonemBaslangic,
        DonemBitis,
        Aciklama,
        CreatedAt,
    }
}

mod m20250101_000003_create_users_table {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250101_000003_create_users_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Users::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Users::Id).uuid().primary_key().not_null())
                        .col(ColumnDef::new(Users::Email).string().null())
                        .col(ColumnDef::new(Users::Phone).string().null())
                        .col(ColumnDef::new(Users::FullName).string().not_null())
                        .col(ColumnDef::new(Users::PasswordHash).string().not_null())
                        .col(
                            ColumnDef::new(Users::IsVerified)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .col(
                            ColumnDef::new(Users::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_users_email")
                        .table(Users::Table)
                        .col(Users::Email)
                        .unique()
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_users_phone")
                        .table(Users::Table)
                        .col(Users::Phone)
                        .unique()
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(VerificationCodes::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(VerificationCodes::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(VerificationCodes::Identifier)
                                .string()
                                .not_null(),
                        )
                        .col(ColumnDef::new(VerificationCodes::Code).string().not_null())
                        .col(
                            ColumnDef::new(VerificationCodes::Purpose)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(VerificationCodes::ExpiresAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(VerificationCodes::Consumed)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .col(
                            ColumnDef::new(VerificationCodes::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_verification_codes_identifier")
                        .table(VerificationCodes::Table)
                        .col(VerificationCodes::Identifier)
                        .to_owned(),
                )
                .await?;

            Ok(())
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(VerificationCodes::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Users::Table).to_owned())
                .await
        }
    }

    #[derive(Iden)]
    enum Users {
        Table,
        Id,
        Email,
        Phone,
        FullName,
        PasswordHash,
        IsVerified,
        CreatedAt,
    }

    #[derive(Iden)]
    enum VerificationCodes {
        Table,
        Id,
        Identifier,
        Code,
        Purpose,
        ExpiresAt,
        Consumed,
        CreatedAt,
    }
}

mod m20250101_000004_create_biometric_credentials_table {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250101_000004_create_biometric_credentials_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(BiometricCredentials::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(BiometricCredentials::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(BiometricCredentials::UserId)
                                .uuid()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(BiometricCredentials::CredentialId)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(BiometricCredentials::PublicKey)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(BiometricCredentials::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_biometric_credentials_credential_id")
                        .table(BiometricCredentials::Table)
                        .col(BiometricCredentials::CredentialId)
                        .unique()
                        .to_owned(),
                )
                .await?;

            Ok(())
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(BiometricCredentials::Table).to_owned())
                .await
        }
    }

    #[derive(Iden)]
    enum BiometricCredentials {
        Table,
        Id,
        UserId,
        CredentialId,
        PublicKey,
        CreatedAt,
    }
}
