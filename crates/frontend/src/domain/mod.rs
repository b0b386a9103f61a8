pub mod a001_qa_chat;
