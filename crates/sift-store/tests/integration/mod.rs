mod document_lifecycle;
mod scroll_enumeration;
mod search_flow;
