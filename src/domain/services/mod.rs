pub mod selection_service;
