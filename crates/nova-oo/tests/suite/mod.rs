mod index;
mod resolve_method;
mod unary;
