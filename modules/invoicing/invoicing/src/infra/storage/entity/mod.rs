pub mod address;
pub mod customer;
pub mod invoice;
pub mod invoice_item;
pub mod product;
