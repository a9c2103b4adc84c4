pub mod transliterator_contract;
