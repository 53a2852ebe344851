//! bai2lib — библиотека для чтения банковских выписок BAI2 и выгрузки в JSON/CSV

pub mod error;
pub mod model;
pub mod traits;

pub mod formats {
    pub mod bai2;
    pub mod csv;
    pub mod json;
}
